#![allow(dead_code)]

use ensgate_resolver::{
    Address, CanonicalLookupSource, ConnectMode, NetworkContext, NetworkRegistry, Provider,
    TransportError,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

pub const ADDRESS: &str = "0xe2222bb6633228143C4Ce8fC4642aa33b857B332";
pub const VITALIK: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

pub fn address(value: &str) -> Address {
    value.parse().expect("valid address")
}

/// Call counters shared by a mock provider and its lookup source.
#[derive(Default)]
pub struct MockState {
    pub connects: AtomicUsize,
    pub disconnects: AtomicUsize,
    pub forward: AtomicUsize,
    pub reverse: AtomicUsize,
    pub owner: AtomicUsize,
    pub connected: AtomicBool,
    pub records: Mutex<HashMap<String, Address>>,
    pub lookup_error: Mutex<Option<TransportError>>,
    pub registries: Mutex<Vec<Option<Address>>>,
}

impl MockState {
    fn fail_or_count(&self, counter: &AtomicUsize) -> Result<(), TransportError> {
        counter.fetch_add(1, Ordering::SeqCst);
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::Connection("not connected".into()));
        }
        match self.lookup_error.lock().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl CanonicalLookupSource for MockState {
    fn forward_lookup(&self, name: &str) -> Result<Option<Address>, TransportError> {
        self.fail_or_count(&self.forward)?;
        Ok(self.records.lock().get(name).copied())
    }

    fn reverse_lookup(&self, address: &Address) -> Result<Option<String>, TransportError> {
        self.fail_or_count(&self.reverse)?;
        let records = self.records.lock();
        let mut names: Vec<&String> = records
            .iter()
            .filter(|(_, value)| *value == address)
            .map(|(name, _)| name)
            .collect();
        names.sort();
        Ok(names.first().map(|name| name.to_string()))
    }

    fn owner_lookup(&self, name: &str) -> Result<Option<Address>, TransportError> {
        self.fail_or_count(&self.owner)?;
        Ok(self.records.lock().get(name).copied())
    }
}

pub struct MockProvider {
    pub name: String,
    pub network: NetworkContext,
    pub supports: bool,
    pub fail_connect: bool,
    pub state: Arc<MockState>,
}

impl MockProvider {
    pub fn new(name: &str, network: NetworkContext) -> Self {
        Self {
            name: name.to_string(),
            network,
            supports: true,
            fail_connect: false,
            state: Arc::new(MockState::default()),
        }
    }

    pub fn mainnet(name: &str) -> Self {
        Self::new(name, NetworkContext::canonical())
    }

    pub fn without_lookups(mut self) -> Self {
        self.supports = false;
        self
    }

    pub fn failing_connect(mut self) -> Self {
        self.fail_connect = true;
        self
    }

    pub fn with_record(self, name: &str, value: &str) -> Self {
        self.state.records.lock().insert(name.to_string(), address(value));
        self
    }

    /// Mark connected without counting a connection attempt.
    pub fn already_connected(self) -> Self {
        self.state.connected.store(true, Ordering::SeqCst);
        self
    }

    pub fn fail_lookups_with(&self, err: TransportError) {
        *self.state.lookup_error.lock() = Some(err);
    }

    pub fn is_connected_now(&self) -> bool {
        self.state.connected.load(Ordering::SeqCst)
    }

    pub fn connects(&self) -> usize {
        self.state.connects.load(Ordering::SeqCst)
    }

    pub fn disconnects(&self) -> usize {
        self.state.disconnects.load(Ordering::SeqCst)
    }

    pub fn forward_calls(&self) -> usize {
        self.state.forward.load(Ordering::SeqCst)
    }

    pub fn reverse_calls(&self) -> usize {
        self.state.reverse.load(Ordering::SeqCst)
    }

    pub fn owner_calls(&self) -> usize {
        self.state.owner.load(Ordering::SeqCst)
    }

    pub fn network_calls(&self) -> usize {
        self.forward_calls() + self.reverse_calls() + self.owner_calls()
    }

    pub fn registries_requested(&self) -> Vec<Option<Address>> {
        self.state.registries.lock().clone()
    }
}

impl Provider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn network(&self) -> NetworkContext {
        self.network.clone()
    }

    fn connect(&self, _mode: ConnectMode) -> Result<(), TransportError> {
        self.state.connects.fetch_add(1, Ordering::SeqCst);
        if self.fail_connect {
            return Err(TransportError::Connection("connection refused".into()));
        }
        self.state.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn disconnect(&self) {
        self.state.disconnects.fetch_add(1, Ordering::SeqCst);
        self.state.connected.store(false, Ordering::SeqCst);
    }

    fn is_connected(&self) -> bool {
        self.state.connected.load(Ordering::SeqCst)
    }

    fn supports_lookups(&self) -> bool {
        self.supports
    }

    fn lookup_source(
        &self,
        registry: Option<&Address>,
    ) -> Result<Arc<dyn CanonicalLookupSource>, TransportError> {
        self.state.registries.lock().push(registry.copied());
        Ok(self.state.clone())
    }
}

/// Network registry with the given providers registered in order.
pub fn networks_with(providers: &[Arc<MockProvider>]) -> Arc<NetworkRegistry> {
    let networks = Arc::new(NetworkRegistry::new());
    for provider in providers {
        networks.register(provider.clone());
    }
    networks
}
