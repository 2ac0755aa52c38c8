//! Registry of known networks, their candidate providers and the active
//! provider.
//!
//! This is the host-side view the locator searches. The caller owns the
//! notion of "active" and may switch it at any time; the resolver only
//! reads it.

use crate::errors::*;
use crate::provider::{same_provider, ConnectMode, Provider};
use ensgate_types::NetworkContext;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::info;

#[derive(Default)]
struct NetworkProviders {
    default: Option<String>,
    providers: Vec<Arc<dyn Provider>>,
}

/// Candidate providers per network plus the currently active provider.
#[derive(Default)]
pub struct NetworkRegistry {
    networks: RwLock<BTreeMap<NetworkContext, NetworkProviders>>,
    active: RwLock<Option<Arc<dyn Provider>>>,
}

impl NetworkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a candidate under its own network. Candidates keep their
    /// registration order.
    pub fn register(&self, provider: Arc<dyn Provider>) {
        let mut networks = self.networks.write();
        networks
            .entry(provider.network())
            .or_default()
            .providers
            .push(provider);
    }

    /// Mark `name` as the default candidate for `network`.
    pub fn set_default_provider(&self, network: &NetworkContext, name: &str) -> Result<()> {
        let mut networks = self.networks.write();
        let entry = networks
            .get_mut(network)
            .ok_or_else(|| ResolverError::UnknownNetwork(network.clone()))?;

        if !entry.providers.iter().any(|p| p.name() == name) {
            return Err(ResolverError::UnknownProvider {
                name: name.to_string(),
                network: network.clone(),
            });
        }
        entry.default = Some(name.to_string());
        Ok(())
    }

    pub fn default_provider(&self, network: &NetworkContext) -> Option<Arc<dyn Provider>> {
        let networks = self.networks.read();
        let entry = networks.get(network)?;
        let default = entry.default.as_deref()?;
        entry.providers.iter().find(|p| p.name() == default).cloned()
    }

    /// All candidates for `network` in registration order.
    pub fn providers(&self, network: &NetworkContext) -> Vec<Arc<dyn Provider>> {
        self.networks
            .read()
            .get(network)
            .map(|entry| entry.providers.clone())
            .unwrap_or_default()
    }

    pub fn active_provider(&self) -> Option<Arc<dyn Provider>> {
        self.active.read().clone()
    }

    pub fn active_context(&self) -> Option<NetworkContext> {
        self.active.read().as_ref().map(|p| p.network())
    }

    /// Replace the active provider without connecting anything.
    pub fn set_active(&self, provider: Option<Arc<dyn Provider>>) {
        *self.active.write() = provider;
    }

    /// Connect to `network` and make it active.
    ///
    /// Uses the default candidate when one is set, otherwise the first
    /// registered one. The previously active provider is disconnected
    /// unless it is the one being activated.
    pub fn activate(&self, network: &NetworkContext) -> Result<Arc<dyn Provider>> {
        let provider = self
            .default_provider(network)
            .or_else(|| self.providers(network).into_iter().next())
            .ok_or_else(|| ResolverError::UnknownNetwork(network.clone()))?;

        if !provider.is_connected() {
            provider
                .connect(ConnectMode::Verbose)
                .map_err(|err| ResolverError::NoProviderAvailable {
                    network: network.clone(),
                    reason: format!("failed to connect '{}'", provider.name()),
                    source: Some(err),
                })?;
        }

        let previous = self.active.write().replace(provider.clone());
        if let Some(previous) = previous {
            if !same_provider(&previous, &provider) {
                previous.disconnect();
            }
        }

        info!(network = %network, provider = provider.name(), "activated network");
        Ok(provider)
    }
}

impl fmt::Debug for NetworkRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let networks = self.networks.read();
        let mut map = f.debug_map();
        for (network, entry) in networks.iter() {
            let names: Vec<&str> = entry.providers.iter().map(|p| p.name()).collect();
            map.entry(&network.to_string(), &names);
        }
        map.finish()?;
        if let Some(active) = self.active.read().as_ref() {
            write!(f, " active={}:{}", active.network(), active.name())?;
        }
        Ok(())
    }
}
