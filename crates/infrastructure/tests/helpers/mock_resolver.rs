use async_trait::async_trait;
use mhos_dns_application::ports::SystemResolver;
use mhos_dns_domain::DomainError;
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::Semaphore;

/// Stands in for the host resolver, which tests cannot rely on.
#[derive(Clone)]
pub struct MockSystemResolver {
    responses: Arc<RwLock<HashMap<String, Ipv4Addr>>>,
    calls: Arc<AtomicUsize>,
    paused: Arc<AtomicBool>,
    gate: Arc<Semaphore>,
}

impl Default for MockSystemResolver {
    fn default() -> Self {
        Self {
            responses: Arc::default(),
            calls: Arc::default(),
            paused: Arc::default(),
            gate: Arc::new(Semaphore::new(0)),
        }
    }
}

impl MockSystemResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_response(&self, domain: &str, address: &str) {
        self.responses
            .write()
            .unwrap()
            .insert(domain.to_string(), address.parse().unwrap());
    }

    /// Lookups block until [`release`](Self::release) is called.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.paused.store(false, Ordering::SeqCst);
        self.gate.add_permits(Semaphore::MAX_PERMITS / 2);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn wait_for_calls(&self, expected: usize) {
        tokio::time::timeout(std::time::Duration::from_secs(2), async {
            while self.calls() < expected {
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("resolver was not called in time");
    }
}

#[async_trait]
impl SystemResolver for MockSystemResolver {
    async fn resolve_ipv4(&self, domain: &str) -> Result<Ipv4Addr, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.paused.load(Ordering::SeqCst) {
            let _permit = self.gate.acquire().await;
        }
        self.responses
            .read()
            .unwrap()
            .get(domain)
            .copied()
            .ok_or(DomainError::NxDomain)
    }
}
