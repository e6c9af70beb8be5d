use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tokio::net::UdpSocket;

pub fn build_query(id: u16, domain: &str) -> Vec<u8> {
    build_query_with_type(id, domain, RecordType::A)
}

pub fn build_query_with_type(id: u16, domain: &str, record_type: RecordType) -> Vec<u8> {
    let mut query = Query::new();
    query.set_name(Name::from_str(domain).unwrap());
    query.set_query_type(record_type);
    query.set_query_class(DNSClass::IN);

    let mut message = Message::new(id, MessageType::Query, OpCode::Query);
    message.set_recursion_desired(true);
    message.add_query(query);

    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);
    message.emit(&mut encoder).unwrap();
    buf
}

/// Plain UDP client talking to the server under test.
pub struct DnsTestClient {
    socket: UdpSocket,
    server: SocketAddr,
}

impl DnsTestClient {
    pub async fn connect(server: SocketAddr) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        Self { socket, server }
    }

    pub async fn send_raw(&self, payload: &[u8]) {
        self.socket.send_to(payload, self.server).await.unwrap();
    }

    pub async fn recv_raw(&self) -> Option<Vec<u8>> {
        let mut buf = vec![0u8; 4096];
        match tokio::time::timeout(Duration::from_secs(2), self.socket.recv_from(&mut buf)).await {
            Ok(Ok((len, _))) => Some(buf[..len].to_vec()),
            _ => None,
        }
    }

    pub async fn query(&self, id: u16, domain: &str) -> Message {
        self.send_raw(&build_query(id, domain)).await;
        let reply = self.recv_raw().await.expect("no reply from server");
        Message::from_vec(&reply).unwrap()
    }
}
