//! DNS wire format for the responder, built on `hickory-proto`.

mod query_parser;
mod response_builder;

pub use query_parser::{parse_query, ParsedQuery};
pub use response_builder::ResponseBuilder;
