use crate::ports::SystemResolver;
use mhos_dns_domain::{DomainError, DomainTable};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    Table,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub address: Ipv4Addr,
    pub source: ResolutionSource,
}

/// Applies the resolution policy: domain table (exact, then wildcard), then
/// the system resolver, otherwise NXDOMAIN.
pub struct ResolveDomainUseCase {
    table: Arc<DomainTable>,
    fallback: Arc<dyn SystemResolver>,
}

impl ResolveDomainUseCase {
    pub fn new(table: Arc<DomainTable>, fallback: Arc<dyn SystemResolver>) -> Self {
        Self { table, fallback }
    }

    pub fn table(&self) -> &DomainTable {
        &self.table
    }

    /// `domain` must already be normalized.
    ///
    /// Any fallback failure is reported as [`DomainError::NxDomain`]; the
    /// underlying cause only reaches the logs.
    pub async fn execute(&self, domain: &str) -> Result<Resolution, DomainError> {
        if let Some(address) = self.table.lookup(domain) {
            return Ok(Resolution {
                address,
                source: ResolutionSource::Table,
            });
        }

        debug!(domain = %domain, "Domain not in table, falling back to system resolver");
        let start = Instant::now();

        match self.fallback.resolve_ipv4(domain).await {
            Ok(address) => {
                debug!(
                    domain = %domain,
                    %address,
                    elapsed_us = start.elapsed().as_micros() as u64,
                    "System resolver answered"
                );
                Ok(Resolution {
                    address,
                    source: ResolutionSource::System,
                })
            }
            Err(e) => {
                debug!(domain = %domain, error = %e, "System resolver failed");
                Err(DomainError::NxDomain)
            }
        }
    }
}
