use async_trait::async_trait;
use mhos_dns_domain::DomainError;
use std::net::Ipv4Addr;

/// Forward lookup through whatever resolver the host is configured with.
#[async_trait]
pub trait SystemResolver: Send + Sync {
    /// Returns the first IPv4 address for `domain`, or
    /// [`DomainError::NxDomain`] when the name has none.
    async fn resolve_ipv4(&self, domain: &str) -> Result<Ipv4Addr, DomainError>;
}
