use super::ParsedQuery;
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use mhos_dns_domain::DomainError;
use std::net::Ipv4Addr;
use std::str::FromStr;

const HEADER_LEN: usize = 12;
const QR_BIT: u8 = 0x80;

/// Builds replies correlated to a [`ParsedQuery`]: same id, op code, RD flag
/// and question section.
pub struct ResponseBuilder;

impl ResponseBuilder {
    /// NOERROR reply with a single A record for the normalized query name.
    ///
    /// The question type is not inspected; every question gets an A answer.
    pub fn answer(query: &ParsedQuery, address: Ipv4Addr, ttl: u32) -> Result<Vec<u8>, DomainError> {
        let mut response = Self::reply_to(query.message());

        let name = Name::from_str(&format!("{}.", query.domain)).map_err(|e| {
            DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", query.domain, e))
        })?;
        response.add_answer(Record::from_rdata(name, ttl, RData::A(A(address))));

        Self::serialize_message(&response)
    }

    pub fn nxdomain(query: &ParsedQuery) -> Result<Vec<u8>, DomainError> {
        let mut response = Self::reply_to(query.message());
        response.set_response_code(ResponseCode::NXDomain);
        Self::serialize_message(&response)
    }

    /// FORMERR carrying the transaction id of a payload that did not decode.
    ///
    /// Returns `None` when even the header is incomplete, or when the payload
    /// is itself a response (QR set); such datagrams get no reply at all.
    pub fn format_error(buf: &[u8]) -> Option<Vec<u8>> {
        if buf.len() < HEADER_LEN || buf[2] & QR_BIT != 0 {
            return None;
        }

        let id = u16::from_be_bytes([buf[0], buf[1]]);
        let mut response = Message::new(id, MessageType::Response, OpCode::Query);
        response.set_response_code(ResponseCode::FormErr);
        Self::serialize_message(&response).ok()
    }

    fn reply_to(request: &Message) -> Message {
        let mut response = Message::new(request.id(), MessageType::Response, request.op_code());
        response.set_recursion_desired(request.recursion_desired());
        response.set_recursion_available(true);
        for question in request.queries() {
            response.add_query(question.clone());
        }
        response
    }

    fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::ResponseEncoding(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}
