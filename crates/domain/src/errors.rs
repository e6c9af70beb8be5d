use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid DNS request: {0}")]
    InvalidDnsRequest(String),

    #[error("Failed to encode DNS response: {0}")]
    ResponseEncoding(String),

    #[error("Domain not found (NXDOMAIN)")]
    NxDomain,

    #[error("System resolver error: {0}")]
    ResolverError(String),
}
