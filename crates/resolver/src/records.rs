//! In-memory record-book provider.
//!
//! A record book is a JSON document listing name records and the providers
//! that serve them. It stands in for a live network so the resolver (and
//! the CLI) can run offline against fixed data:
//!
//! ```json
//! {
//!   "providers": [
//!     { "name": "fixture", "network": "ethereum:mainnet", "default": true },
//!     { "name": "sidechain", "network": "polygon:mainnet", "serves_names": false }
//!   ],
//!   "records": [
//!     { "name": "vitalik.eth", "address": "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045" }
//!   ]
//! }
//! ```

use crate::errors::*;
use crate::network::NetworkRegistry;
use crate::provider::{CanonicalLookupSource, ConnectMode, Provider};
use ensgate_types::{Address, NetworkContext};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    pub name: String,
    pub address: Address,
    /// Registry owner; defaults to `address`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Address>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDecl {
    pub name: String,
    pub network: NetworkContext,
    #[serde(default = "default_true")]
    pub serves_names: bool,
    #[serde(default)]
    pub default: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordBook {
    #[serde(default)]
    pub providers: Vec<ProviderDecl>,
    #[serde(default)]
    pub records: Vec<NameRecord>,
    /// Extra registry deployments that serve the same records.
    #[serde(default)]
    pub registries: Vec<Address>,
}

impl RecordBook {
    pub fn load(path: &Path) -> std::result::Result<Self, RecordBookError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> std::result::Result<Self, RecordBookError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn forward(&self, name: &str) -> Option<Address> {
        self.records
            .iter()
            .find(|record| record.name == name)
            .map(|record| record.address)
    }

    /// First record pointing at `address`.
    pub fn reverse(&self, address: &Address) -> Option<String> {
        self.records
            .iter()
            .find(|record| record.address == *address)
            .map(|record| record.name.clone())
    }

    pub fn owner(&self, name: &str) -> Option<Address> {
        self.records
            .iter()
            .find(|record| record.name == name)
            .map(|record| record.owner.unwrap_or(record.address))
    }

    /// Build a network registry with one provider per declaration.
    pub fn into_networks(self) -> Result<Arc<NetworkRegistry>> {
        let mut seen = HashSet::new();
        for decl in &self.providers {
            if !seen.insert((decl.network.clone(), decl.name.clone())) {
                return Err(RecordBookError::DuplicateProvider {
                    name: decl.name.clone(),
                    network: decl.network.clone(),
                }
                .into());
            }
        }

        let book = Arc::new(self);
        let networks = Arc::new(NetworkRegistry::new());
        for decl in &book.providers {
            networks.register(Arc::new(RecordBookProvider::new(decl, book.clone())));
        }
        for decl in book.providers.iter().filter(|decl| decl.default) {
            networks.set_default_provider(&decl.network, &decl.name)?;
        }
        Ok(networks)
    }
}

/// Provider answering lookups from a [`RecordBook`].
#[derive(Debug)]
pub struct RecordBookProvider {
    name: String,
    network: NetworkContext,
    serves_names: bool,
    book: Arc<RecordBook>,
    connected: Arc<AtomicBool>,
}

impl RecordBookProvider {
    pub fn new(decl: &ProviderDecl, book: Arc<RecordBook>) -> Self {
        Self {
            name: decl.name.clone(),
            network: decl.network.clone(),
            serves_names: decl.serves_names,
            book,
            connected: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Provider for RecordBookProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn network(&self) -> NetworkContext {
        self.network.clone()
    }

    fn connect(&self, mode: ConnectMode) -> std::result::Result<(), TransportError> {
        self.connected.store(true, Ordering::SeqCst);
        if mode.is_quiet() {
            debug!(provider = %self.name, network = %self.network, "record book connected");
        } else {
            info!(provider = %self.name, network = %self.network, "record book connected");
        }
        Ok(())
    }

    fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn supports_lookups(&self) -> bool {
        self.serves_names
    }

    fn lookup_source(
        &self,
        registry: Option<&Address>,
    ) -> std::result::Result<Arc<dyn CanonicalLookupSource>, TransportError> {
        if !self.serves_names {
            return Err(TransportError::CannotHandleRequest(format!(
                "provider '{}' does not serve name lookups",
                self.name
            )));
        }
        if let Some(registry) = registry {
            if !self.book.registries.contains(registry) {
                return Err(TransportError::BadCallOutput(format!(
                    "registry {registry} returned no data"
                )));
            }
        }
        Ok(Arc::new(RecordBookSource {
            provider: self.name.clone(),
            book: self.book.clone(),
            connected: self.connected.clone(),
        }))
    }
}

struct RecordBookSource {
    provider: String,
    book: Arc<RecordBook>,
    connected: Arc<AtomicBool>,
}

impl RecordBookSource {
    fn ensure_connected(&self) -> std::result::Result<(), TransportError> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(TransportError::Connection(format!(
                "provider '{}' is not connected",
                self.provider
            )))
        }
    }
}

impl CanonicalLookupSource for RecordBookSource {
    fn forward_lookup(&self, name: &str) -> std::result::Result<Option<Address>, TransportError> {
        self.ensure_connected()?;
        Ok(self.book.forward(name))
    }

    fn reverse_lookup(
        &self,
        address: &Address,
    ) -> std::result::Result<Option<String>, TransportError> {
        self.ensure_connected()?;
        Ok(self.book.reverse(address))
    }

    fn owner_lookup(&self, name: &str) -> std::result::Result<Option<Address>, TransportError> {
        self.ensure_connected()?;
        Ok(self.book.owner(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOK: &str = r#"{
        "providers": [
            { "name": "node", "network": "ethereum:mainnet", "default": true },
            { "name": "bridge", "network": "polygon:mainnet", "serves_names": false }
        ],
        "records": [
            { "name": "test.eth", "address": "0xe2222bb6633228143C4Ce8fC4642aa33b857B332" },
            { "name": "alias.eth", "address": "0xe2222bb6633228143C4Ce8fC4642aa33b857B332",
              "owner": "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045" }
        ]
    }"#;

    #[test]
    fn lookups_follow_record_order() {
        let book = RecordBook::from_json(BOOK).unwrap();
        let address: Address = "0xe2222bb6633228143C4Ce8fC4642aa33b857B332".parse().unwrap();

        assert_eq!(book.forward("test.eth"), Some(address));
        assert_eq!(book.forward("missing.eth"), None);
        assert_eq!(book.reverse(&address).as_deref(), Some("test.eth"));
        assert_eq!(book.owner("test.eth"), Some(address));
        assert_ne!(book.owner("alias.eth"), Some(address));
    }

    #[test]
    fn builds_networks_with_defaults() {
        let networks = RecordBook::from_json(BOOK).unwrap().into_networks().unwrap();
        let mainnet = NetworkContext::canonical();

        let default = networks.default_provider(&mainnet).unwrap();
        assert_eq!(default.name(), "node");
        assert!(default.supports_lookups());

        let polygon = NetworkContext::new("polygon", "mainnet");
        let bridges = networks.providers(&polygon);
        let bridge = &bridges[0];
        assert!(!bridge.supports_lookups());
        assert!(matches!(
            bridge.lookup_source(None),
            Err(TransportError::CannotHandleRequest(_))
        ));
    }

    #[test]
    fn source_requires_connection() {
        let networks = RecordBook::from_json(BOOK).unwrap().into_networks().unwrap();
        let provider = networks.default_provider(&NetworkContext::canonical()).unwrap();
        let source = provider.lookup_source(None).unwrap();

        assert!(matches!(
            source.forward_lookup("test.eth"),
            Err(TransportError::Connection(_))
        ));

        provider.connect(ConnectMode::Quiet).unwrap();
        assert!(source.forward_lookup("test.eth").unwrap().is_some());
    }

    #[test]
    fn unknown_registry_deployment_is_bad_output() {
        let networks = RecordBook::from_json(BOOK).unwrap().into_networks().unwrap();
        let provider = networks.default_provider(&NetworkContext::canonical()).unwrap();
        let bogus = Address([9u8; 20]);

        let err = provider.lookup_source(Some(&bogus)).err().unwrap();
        assert!(err.indicates_missing_registry());
    }

    #[test]
    fn duplicate_providers_rejected() {
        let raw = r#"{ "providers": [
            { "name": "a", "network": "ethereum:mainnet" },
            { "name": "a", "network": "ethereum:mainnet" }
        ] }"#;
        let err = RecordBook::from_json(raw).unwrap().into_networks().unwrap_err();
        assert!(matches!(
            err,
            ResolverError::RecordBook(RecordBookError::DuplicateProvider { .. })
        ));
    }
}
