//! Base implementation for domain-specific API clients.

use crate::client::Dispatcher;
use crate::domains::{DomainClient, DomainOperations, ValidationOperations};
use std::sync::Arc;

/// Base client for domain-specific API implementations
pub struct BaseDomainClient {
    dispatcher: Arc<Dispatcher>,
    domain_name: String,
}

impl BaseDomainClient {
    pub fn new(dispatcher: Arc<Dispatcher>, domain_name: impl Into<String>) -> Self {
        Self {
            dispatcher,
            domain_name: domain_name.into(),
        }
    }
}

impl DomainClient for BaseDomainClient {
    fn domain_name(&self) -> &str {
        &self.domain_name
    }
}

impl ValidationOperations for BaseDomainClient {}

impl DomainOperations for BaseDomainClient {
    fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}
