use super::message::{parse_query, ResponseBuilder};
use mhos_dns_application::use_cases::ResolveDomainUseCase;
use mhos_dns_domain::{DomainError, Notification};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// What to send back for one datagram, and what to tell observers about it.
#[derive(Debug)]
pub struct HandledRequest {
    pub reply: Option<Vec<u8>>,
    pub notification: Notification,
}

pub struct DnsRequestHandler {
    use_case: Arc<ResolveDomainUseCase>,
    answer_ttl: u32,
}

impl DnsRequestHandler {
    pub fn new(use_case: Arc<ResolveDomainUseCase>, answer_ttl: u32) -> Self {
        Self {
            use_case,
            answer_ttl,
        }
    }

    /// Decodes, resolves and encodes one request.
    ///
    /// Always yields exactly one notification: `[name] resolved`,
    /// `[name] not found`, a malformed-request error, or an encoding error
    /// when no reply could be built.
    pub async fn handle(&self, payload: &[u8], sender: SocketAddr) -> HandledRequest {
        let query = match parse_query(payload) {
            Ok(query) => query,
            Err(e) => {
                warn!(client = %sender, bytes = payload.len(), error = %e, "Dropping malformed DNS request");
                return HandledRequest {
                    reply: ResponseBuilder::format_error(payload),
                    notification: Notification::error(format!(
                        "Malformed request from {} dropped",
                        sender
                    )),
                };
            }
        };

        let domain = query.domain.clone();
        info!(domain = %domain, record_type = ?query.record_type, client = %sender, "DNS query received");

        let (reply, notification) = match self.use_case.execute(&domain).await {
            Ok(resolution) => {
                debug!(
                    domain = %domain,
                    address = %resolution.address,
                    source = ?resolution.source,
                    "Domain resolved"
                );
                (
                    ResponseBuilder::answer(&query, resolution.address, self.answer_ttl),
                    Notification::info(format!("[{}] resolved", domain)),
                )
            }
            Err(_) => {
                debug!(domain = %domain, "Domain not found, answering NXDOMAIN");
                (
                    ResponseBuilder::nxdomain(&query),
                    Notification::error(format!("[{}] not found", domain)),
                )
            }
        };

        settle(&domain, reply, notification)
    }
}

/// A reply that failed to encode is never sent, so its notification must not
/// claim success.
fn settle(
    domain: &str,
    reply: Result<Vec<u8>, DomainError>,
    notification: Notification,
) -> HandledRequest {
    match reply {
        Ok(bytes) => HandledRequest {
            reply: Some(bytes),
            notification,
        },
        Err(e) => {
            error!(domain = %domain, error = %e, "Failed to build DNS response");
            HandledRequest {
                reply: None,
                notification: Notification::error(format!(
                    "[{}] response could not be built",
                    domain
                )),
            }
        }
    }
}
