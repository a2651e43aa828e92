//! Address resolution shared by the server and client

use std::io;
use std::net::{SocketAddr, ToSocketAddrs};

/// Resolve `host:port`, preferring an IPv4 address when both families resolve
pub fn resolve_addr(addr: &str) -> io::Result<SocketAddr> {
    let candidates: Vec<SocketAddr> = addr.to_socket_addrs()?.collect();

    candidates
        .iter()
        .find(|candidate| candidate.is_ipv4())
        .or_else(|| candidates.first())
        .copied()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} did not resolve to any address", addr),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_literal_address() {
        let addr = resolve_addr("127.0.0.1:4433").unwrap();
        assert_eq!(addr, "127.0.0.1:4433".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn test_resolve_localhost_prefers_ipv4() {
        let addr = resolve_addr("localhost:4433").unwrap();
        assert_eq!(addr.port(), 4433);
        assert!(addr.is_ipv4());
        assert!(addr.ip().is_loopback());
    }

    #[test]
    fn test_resolve_ipv6_literal() {
        let addr = resolve_addr("[::1]:4433").unwrap();
        assert!(addr.is_ipv6());
    }

    #[test]
    fn test_resolve_missing_port_fails() {
        assert!(resolve_addr("localhost").is_err());
        assert!(resolve_addr("not an address").is_err());
    }
}
