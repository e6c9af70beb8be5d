#![allow(dead_code)]

use async_trait::async_trait;
use mhos_dns_application::ports::SystemResolver;
use mhos_dns_domain::DomainError;
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// System resolver stand-in: answers from a fixed map, misses everything else.
#[derive(Clone, Default)]
pub struct MockSystemResolver {
    responses: Arc<RwLock<HashMap<String, Ipv4Addr>>>,
    errors: Arc<RwLock<HashMap<String, DomainError>>>,
    calls: Arc<AtomicUsize>,
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

    pub fn set_error(&self, domain: &str, error: DomainError) {
        self.errors
            .write()
            .unwrap()
            .insert(domain.to_string(), error);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SystemResolver for MockSystemResolver {
    async fn resolve_ipv4(&self, domain: &str) -> Result<Ipv4Addr, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(err) = self.errors.read().unwrap().get(domain).cloned() {
            return Err(err);
        }

        self.responses
            .read()
            .unwrap()
            .get(domain)
            .copied()
            .ok_or(DomainError::NxDomain)
    }
}
