use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{SocketAddr, SocketAddrV4};
use tracing::{debug, warn};

/// Creates a non-blocking IPv4 UDP socket bound to `addr`.
///
/// Port reuse is preferred; address reuse is the fallback on platforms (or
/// kernels) without it. Failing to set either option is not fatal.
pub fn create_udp_socket(addr: SocketAddrV4) -> io::Result<std::net::UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    enable_reuse(&socket);
    socket.bind(&SocketAddr::V4(addr).into())?;
    socket.set_nonblocking(true)?;
    Ok(socket.into())
}

#[cfg(all(
    unix,
    not(any(target_os = "solaris", target_os = "illumos", target_os = "cygwin"))
))]
fn enable_reuse(socket: &Socket) {
    if let Err(e) = socket.set_reuse_port(true) {
        debug!(error = %e, "SO_REUSEPORT unavailable, falling back to SO_REUSEADDR");
        enable_reuse_address(socket);
    }
}

#[cfg(not(all(
    unix,
    not(any(target_os = "solaris", target_os = "illumos", target_os = "cygwin"))
)))]
fn enable_reuse(socket: &Socket) {
    enable_reuse_address(socket);
}

fn enable_reuse_address(socket: &Socket) {
    if let Err(e) = socket.set_reuse_address(true) {
        warn!(error = %e, "SO_REUSEADDR unavailable");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_create_udp_socket_binds_ephemeral_port() {
        let socket = create_udp_socket(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 0)).unwrap();
        let local = socket.local_addr().unwrap();

        assert_eq!(local.ip(), Ipv4Addr::LOCALHOST);
        assert_ne!(local.port(), 0);
    }

    #[test]
    fn test_create_udp_socket_rejects_foreign_address() {
        let result = create_udp_socket(SocketAddrV4::new(Ipv4Addr::new(203, 0, 113, 7), 0));
        assert!(result.is_err());
    }
}
