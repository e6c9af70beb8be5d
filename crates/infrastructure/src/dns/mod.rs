pub mod events;
pub mod handler;
pub mod message;
pub mod server;
pub mod socket;

pub use events::NotificationEmitter;
pub use handler::{DnsRequestHandler, HandledRequest};
pub use server::{DnsServer, ServerError, StartOutcome};
