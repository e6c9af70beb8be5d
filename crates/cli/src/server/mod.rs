pub mod dns;
pub mod local_ip;

pub use dns::run_dns_server;
pub use local_ip::resolve_bind_address;
