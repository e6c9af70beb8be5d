use serde::{Deserialize, Serialize};

/// Value of `bind_address` that asks the front end to discover the local address.
pub const AUTO_BIND_ADDRESS: &str = "auto";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// IPv4 address to bind, or `"auto"`.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_dns_port")]
    pub dns_port: u16,

    /// Receive buffer per datagram; classic DNS over UDP caps messages at 512 bytes.
    #[serde(default = "default_recv_buffer_size")]
    pub recv_buffer_size: usize,
}

impl ServerConfig {
    pub fn wants_auto_bind(&self) -> bool {
        self.bind_address.eq_ignore_ascii_case(AUTO_BIND_ADDRESS)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            dns_port: default_dns_port(),
            recv_buffer_size: default_recv_buffer_size(),
        }
    }
}

fn default_bind_address() -> String {
    AUTO_BIND_ADDRESS.to_string()
}

fn default_dns_port() -> u16 {
    53
}

fn default_recv_buffer_size() -> usize {
    512
}
