pub mod system_resolver;

pub use system_resolver::{DisabledResolver, TokioSystemResolver};
