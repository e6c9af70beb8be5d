use async_trait::async_trait;
use mhos_dns_application::ports::SystemResolver;
use mhos_dns_domain::DomainError;
use std::net::{Ipv4Addr, SocketAddr};
use tracing::debug;

/// Platform resolver (`getaddrinfo` on a blocking thread via tokio).
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSystemResolver;

impl TokioSystemResolver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SystemResolver for TokioSystemResolver {
    async fn resolve_ipv4(&self, domain: &str) -> Result<Ipv4Addr, DomainError> {
        if domain.is_empty() {
            return Err(DomainError::NxDomain);
        }

        debug!(domain = %domain, "Performing system lookup");

        let addrs = tokio::net::lookup_host((domain, 0))
            .await
            .map_err(|e| DomainError::ResolverError(format!("{}: {}", domain, e)))?;

        addrs
            .filter_map(|addr| match addr {
                SocketAddr::V4(v4) => Some(*v4.ip()),
                SocketAddr::V6(_) => None,
            })
            .next()
            .ok_or(DomainError::NxDomain)
    }
}

/// Used when fallback is turned off: every unmapped name is NXDOMAIN.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledResolver;

#[async_trait]
impl SystemResolver for DisabledResolver {
    async fn resolve_ipv4(&self, _domain: &str) -> Result<Ipv4Addr, DomainError> {
        Err(DomainError::NxDomain)
    }
}
