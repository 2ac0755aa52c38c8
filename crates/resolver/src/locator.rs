//! Canonical provider location.
//!
//! The locator finds a provider for the canonical network that can answer
//! name lookups, connecting one if needed, and keeps it for as long as the
//! active network context stays the same. A change of active context is
//! only noticed on the next call; nothing is invalidated eagerly.

use crate::errors::*;
use crate::network::NetworkRegistry;
use crate::provider::{same_provider, ConnectMode, Provider};
use ensgate_types::NetworkContext;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Binding state of a resolver's canonical provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    /// No provider has been bound yet.
    Unconfigured,
    /// A provider is bound but has not answered a lookup yet.
    ProviderBound,
    /// The bound provider has answered at least one lookup.
    Active,
}

/// A bound canonical provider.
#[derive(Clone)]
pub struct ProviderHandle {
    provider: Arc<dyn Provider>,
    /// Active context at the time of binding.
    observed: Option<NetworkContext>,
    /// Set when the locator itself connected the provider.
    temporary: bool,
    /// Set when the handle is the active provider rather than a side
    /// connection.
    bound_to_active: bool,
}

impl ProviderHandle {
    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    pub fn network(&self) -> NetworkContext {
        self.provider.network()
    }

    /// Whether the locator opened this connection itself.
    pub fn is_temporary(&self) -> bool {
        self.temporary
    }

    /// Whether the handle is the caller's active provider.
    pub fn is_bound_to_active(&self) -> bool {
        self.bound_to_active
    }
}

impl fmt::Debug for ProviderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderHandle")
            .field("provider", &self.provider.name())
            .field("network", &self.provider.network())
            .field("observed", &self.observed)
            .field("temporary", &self.temporary)
            .field("bound_to_active", &self.bound_to_active)
            .finish()
    }
}

/// Finds and caches a provider for the canonical network.
#[derive(Debug)]
pub struct ProviderLocator {
    networks: Arc<NetworkRegistry>,
    canonical: NetworkContext,
    handle: Option<ProviderHandle>,
    state: ResolverState,
}

impl ProviderLocator {
    pub fn new(networks: Arc<NetworkRegistry>) -> Self {
        Self {
            networks,
            canonical: NetworkContext::canonical(),
            handle: None,
            state: ResolverState::Unconfigured,
        }
    }

    pub fn state(&self) -> ResolverState {
        self.state
    }

    pub fn handle(&self) -> Option<&ProviderHandle> {
        self.handle.as_ref()
    }

    /// Record that the bound provider answered a lookup.
    pub fn mark_active(&mut self) {
        if self.handle.is_some() {
            self.state = ResolverState::Active;
        }
    }

    /// Return the canonical provider, locating and connecting one if the
    /// cached binding is missing or stale.
    ///
    /// Search order: the active provider when it is on the canonical
    /// network, then the canonical network's default candidate, then the
    /// remaining candidates in registration order. Candidates that cannot
    /// serve lookups are skipped.
    pub fn canonical_provider(&mut self) -> Result<ProviderHandle> {
        let active = self.networks.active_provider();
        let active_context = active.as_ref().map(|p| p.network());

        if let Some(handle) = &self.handle {
            if self.is_current(handle, active.as_ref(), active_context.as_ref()) {
                debug!(provider = handle.provider.name(), "reusing canonical provider");
                return Ok(handle.clone());
            }
            debug!(
                provider = handle.provider.name(),
                active = ?active_context,
                "active network changed, rebinding canonical provider"
            );
            self.invalidate(active.as_ref());
        }

        let handle = self.locate(active, active_context)?;
        self.handle = Some(handle.clone());
        self.state = ResolverState::ProviderBound;
        Ok(handle)
    }

    fn is_current(
        &self,
        handle: &ProviderHandle,
        active: Option<&Arc<dyn Provider>>,
        active_context: Option<&NetworkContext>,
    ) -> bool {
        if handle.observed.as_ref() != active_context {
            return false;
        }
        if handle.bound_to_active {
            let still_active = active.is_some_and(|a| same_provider(a, &handle.provider));
            if !still_active {
                return false;
            }
        }
        handle.provider.is_connected()
    }

    fn invalidate(&mut self, active: Option<&Arc<dyn Provider>>) {
        if let Some(handle) = self.handle.take() {
            let now_active = active.is_some_and(|a| same_provider(a, &handle.provider));
            if handle.temporary && !now_active && handle.provider.is_connected() {
                debug!(provider = handle.provider.name(), "releasing temporary connection");
                handle.provider.disconnect();
            }
        }
        self.state = ResolverState::Unconfigured;
    }

    fn locate(
        &self,
        active: Option<Arc<dyn Provider>>,
        active_context: Option<NetworkContext>,
    ) -> Result<ProviderHandle> {
        if let Some(provider) = active {
            if provider.network().is_canonical() && provider.supports_lookups() {
                debug!(
                    provider = provider.name(),
                    network = %provider.network(),
                    "using active provider for name lookups"
                );
                let temporary = self.ensure_connected(&provider)?;
                return Ok(ProviderHandle {
                    provider,
                    observed: active_context,
                    temporary,
                    bound_to_active: true,
                });
            }
        }

        let provider = self.select_candidate()?;
        let temporary = self.ensure_connected(&provider)?;
        Ok(ProviderHandle {
            provider,
            observed: active_context,
            temporary,
            bound_to_active: false,
        })
    }

    /// Connect `provider` quietly if needed. Returns whether this call
    /// opened the connection.
    fn ensure_connected(&self, provider: &Arc<dyn Provider>) -> Result<bool> {
        if provider.is_connected() {
            return Ok(false);
        }

        info!(
            provider = provider.name(),
            network = %self.canonical,
            "connecting to canonical network for name lookups"
        );
        provider.connect(ConnectMode::Quiet).map_err(|err| {
            warn!(provider = provider.name(), error = %err, "canonical provider failed to connect");
            ResolverError::NoProviderAvailable {
                network: self.canonical.clone(),
                reason: format!("failed to connect '{}'", provider.name()),
                source: Some(err),
            }
        })?;
        Ok(true)
    }

    fn select_candidate(&self) -> Result<Arc<dyn Provider>> {
        let default = self.networks.default_provider(&self.canonical);
        if let Some(provider) = &default {
            if provider.supports_lookups() {
                return Ok(provider.clone());
            }
            debug!(provider = provider.name(), "default provider cannot serve name lookups");
        }

        self.networks
            .providers(&self.canonical)
            .into_iter()
            .filter(|p| default.as_ref().map_or(true, |d| !same_provider(d, p)))
            .find(|p| {
                let supported = p.supports_lookups();
                if !supported {
                    debug!(provider = p.name(), "skipping provider without name lookups");
                }
                supported
            })
            .ok_or_else(|| ResolverError::NoProviderAvailable {
                network: self.canonical.clone(),
                reason: "no registered provider can serve name lookups".to_string(),
                source: None,
            })
    }
}
