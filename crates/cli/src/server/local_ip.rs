use mhos_dns_domain::config::ServerConfig;
use std::io;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use tracing::{info, warn};

/// Unroutable route target: connecting a UDP socket sends nothing, it only
/// makes the kernel pick the outbound interface.
const ROUTE_TARGET: (Ipv4Addr, u16) = (Ipv4Addr::new(10, 254, 254, 254), 1);

pub fn resolve_bind_address(config: &ServerConfig) -> String {
    if !config.wants_auto_bind() {
        return config.bind_address.trim().to_string();
    }

    let address = discover_local_ipv4();
    info!(%address, "Auto-detected bind address");
    address.to_string()
}

/// Address of the interface used for outbound traffic, or loopback when there
/// is no usable route.
pub fn discover_local_ipv4() -> Ipv4Addr {
    match outbound_ipv4() {
        Ok(address) if !address.is_unspecified() => address,
        Ok(_) => Ipv4Addr::LOCALHOST,
        Err(e) => {
            warn!(error = %e, "Could not detect local address, using loopback");
            Ipv4Addr::LOCALHOST
        }
    }
}

fn outbound_ipv4() -> io::Result<Ipv4Addr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
    socket.connect(ROUTE_TARGET)?;
    match socket.local_addr()? {
        SocketAddr::V4(addr) => Ok(*addr.ip()),
        SocketAddr::V6(addr) => Err(io::Error::other(format!(
            "unexpected IPv6 local address {}",
            addr
        ))),
    }
}
