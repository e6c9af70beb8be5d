#![allow(dead_code)]
#![allow(unused_imports)]

mod dns_client;
mod mock_resolver;

pub use dns_client::{build_query, build_query_with_type, DnsTestClient};
pub use mock_resolver::MockSystemResolver;

use mhos_dns_application::use_cases::ResolveDomainUseCase;
use mhos_dns_domain::{DomainEntry, DomainTable, Notification};
use mhos_dns_infrastructure::dns::{
    DnsRequestHandler, DnsServer, NotificationEmitter, ServerError, StartOutcome,
};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

pub const TEST_TTL: u32 = 60;

pub fn table(entries: &[(&str, &str)]) -> DomainTable {
    DomainTable::from_entries(
        entries
            .iter()
            .map(|(pattern, ip)| DomainEntry::new(pattern, ip.parse::<Ipv4Addr>().unwrap())),
    )
}

pub fn make_handler(table: DomainTable, resolver: Arc<MockSystemResolver>) -> DnsRequestHandler {
    let use_case = Arc::new(ResolveDomainUseCase::new(Arc::new(table), resolver));
    DnsRequestHandler::new(use_case, TEST_TTL)
}

/// Server on an ephemeral port, not yet started.
pub fn make_server(
    table: DomainTable,
    resolver: Arc<MockSystemResolver>,
) -> (Arc<DnsServer>, UnboundedReceiver<Notification>) {
    let (emitter, rx) = NotificationEmitter::new_enabled();
    let server = DnsServer::new(make_handler(table, resolver), emitter, 0);
    (Arc::new(server), rx)
}

pub struct RunningTestServer {
    pub server: Arc<DnsServer>,
    pub notifications: UnboundedReceiver<Notification>,
    pub task: JoinHandle<Result<StartOutcome, ServerError>>,
    pub addr: SocketAddr,
}

/// Starts a server on 127.0.0.1 and waits for its "started" notification.
pub async fn spawn_server(
    table: DomainTable,
    resolver: Arc<MockSystemResolver>,
) -> RunningTestServer {
    let (server, mut notifications) = make_server(table, resolver);

    let task = {
        let server = server.clone();
        tokio::spawn(async move { server.start("127.0.0.1").await })
    };

    let started = next_notification(&mut notifications).await;
    assert_eq!(started, Notification::info("DNS server started on 127.0.0.1"));

    let addr = server.local_addr().expect("server should be running");
    RunningTestServer {
        server,
        notifications,
        task,
        addr,
    }
}

pub async fn next_notification(rx: &mut UnboundedReceiver<Notification>) -> Notification {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for notification")
        .expect("notification channel closed")
}
