use hickory_proto::op::{Message, MessageType};
use hickory_proto::rr::RecordType;
use mhos_dns_domain::{normalize_domain, DomainError};

/// A decoded query plus everything needed to correlate the reply.
#[derive(Debug, Clone)]
pub struct ParsedQuery {
    /// First question's name, normalized (lowercase, no trailing dot).
    pub domain: String,
    pub record_type: RecordType,
    message: Message,
}

impl ParsedQuery {
    pub fn id(&self) -> u16 {
        self.message.id()
    }

    pub(crate) fn message(&self) -> &Message {
        &self.message
    }
}

/// Decodes an untrusted UDP payload.
///
/// Fails for anything that does not decode, is not a query, or carries no
/// question.
pub fn parse_query(buf: &[u8]) -> Result<ParsedQuery, DomainError> {
    let message = Message::from_vec(buf)
        .map_err(|e| DomainError::InvalidDnsRequest(format!("Failed to parse DNS query: {}", e)))?;

    if message.message_type() != MessageType::Query {
        return Err(DomainError::InvalidDnsRequest(
            "Message is a response, not a query".to_string(),
        ));
    }

    let question = message
        .queries()
        .first()
        .ok_or_else(|| DomainError::InvalidDnsRequest("Query has no question".to_string()))?;

    // Wire form: punycode labels stay `xn--`, matching how the table is written.
    let domain = normalize_domain(&question.name().to_ascii());
    let record_type = question.query_type();

    Ok(ParsedQuery {
        domain,
        record_type,
        message,
    })
}
