pub mod domains;
pub mod errors;
pub mod logging;
pub mod resolver;
pub mod root;
pub mod server;

pub use domains::DomainsConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use resolver::ResolverConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
