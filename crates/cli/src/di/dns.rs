use mhos_dns_application::ports::SystemResolver;
use mhos_dns_application::use_cases::ResolveDomainUseCase;
use mhos_dns_domain::{Config, DomainTable, Notification, TableSource};
use mhos_dns_infrastructure::dns::{DnsRequestHandler, DnsServer, NotificationEmitter};
use mhos_dns_infrastructure::system::{DisabledResolver, TokioSystemResolver};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

pub struct DnsServices {
    pub server: Arc<DnsServer>,
    pub notifications: UnboundedReceiver<Notification>,
    pub table: Arc<DomainTable>,
}

impl DnsServices {
    pub fn new(config: &Config) -> Self {
        let table = Arc::new(Self::load_table(config));
        let fallback = Self::build_fallback(config);

        let use_case = Arc::new(ResolveDomainUseCase::new(table.clone(), fallback));
        let handler = DnsRequestHandler::new(use_case, config.domains.ttl);

        let (emitter, notifications) = NotificationEmitter::new_enabled();
        let server = DnsServer::new(handler, emitter, config.server.dns_port)
            .with_recv_buffer_size(config.server.recv_buffer_size);

        Self {
            server: Arc::new(server),
            notifications,
            table,
        }
    }

    fn load_table(config: &Config) -> DomainTable {
        let (table, report) = DomainTable::load(&config.domains.path);
        match report.source {
            TableSource::File => info!(
                path = %config.domains.path,
                entries = report.loaded,
                skipped = report.skipped.len(),
                "Using domain table file"
            ),
            TableSource::Defaults => info!(
                entries = report.loaded,
                "Using built-in domain table"
            ),
        }
        table
    }

    fn build_fallback(config: &Config) -> Arc<dyn SystemResolver> {
        if config.resolver.fallback_enabled {
            Arc::new(TokioSystemResolver::new())
        } else {
            info!("System resolver fallback disabled, unmapped names get NXDOMAIN");
            Arc::new(DisabledResolver)
        }
    }
}
