//! MHOS DNS Domain Layer
pub mod config;
pub mod domain_name;
pub mod domain_table;
pub mod errors;
pub mod notification;

pub use config::{CliOverrides, Config, ConfigError};
pub use domain_name::normalize_domain;
pub use domain_table::{DomainEntry, DomainTable, LoadReport, TableError, TableSource};
pub use errors::DomainError;
pub use notification::Notification;
