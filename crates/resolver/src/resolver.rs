//! Resolver facade.
//!
//! Answers forward, reverse and owner queries against the canonical name
//! registry, applying the cache policy and turning upstream failures into
//! typed errors. "Not found" is a value (`Ok(None)`), never an error.
//!
//! Operations take `&mut self`: a resolver is driven by one caller at a
//! time. Share one across threads behind a `Mutex` if needed; to share
//! cached resolutions instead, give several resolvers the same
//! [`DynamicCache`].

use crate::cache::{DynamicCache, ResolutionCache, StaticRegistry};
use crate::config::ResolverConfig;
use crate::errors::*;
use crate::locator::{ProviderLocator, ResolverState};
use crate::network::NetworkRegistry;
use crate::provider::CanonicalLookupSource;
use ensgate_namehash::{is_valid_name, normal_namehash};
use ensgate_types::{Address, NetworkContext, NodeId};
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-call overrides for [`Resolver::resolve`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Overrides the configured cache policy for this call only.
    pub use_cache: Option<bool>,
    /// Registry deployment to query instead of the configured one.
    pub registry_address: Option<Address>,
}

impl ResolveOptions {
    pub fn uncached() -> Self {
        Self {
            use_cache: Some(false),
            registry_address: None,
        }
    }

    pub fn with_registry(registry_address: Address) -> Self {
        Self {
            use_cache: None,
            registry_address: Some(registry_address),
        }
    }
}

/// Name resolver bound to the canonical network.
#[derive(Debug)]
pub struct Resolver {
    locator: ProviderLocator,
    cache: ResolutionCache,
    use_cache: bool,
    registry_address: Option<Address>,
}

impl Resolver {
    /// Resolver with default settings and a private, empty cache.
    pub fn new(networks: Arc<NetworkRegistry>) -> Self {
        Self {
            locator: ProviderLocator::new(networks),
            cache: ResolutionCache::default(),
            use_cache: true,
            registry_address: None,
        }
    }

    /// Resolver configured from `config` with a private cache.
    pub fn from_config(networks: Arc<NetworkRegistry>, config: &ResolverConfig) -> Result<Self> {
        Self::with_cache(networks, config, DynamicCache::new())
    }

    /// Resolver configured from `config` that writes into `cache`.
    pub fn with_cache(
        networks: Arc<NetworkRegistry>,
        config: &ResolverConfig,
        cache: DynamicCache,
    ) -> Result<Self> {
        let overrides = config.static_registry()?;
        let registry_address = config.registry_address()?;
        Ok(Self {
            locator: ProviderLocator::new(networks),
            cache: ResolutionCache::new(cache, overrides),
            use_cache: config.use_cache,
            registry_address,
        })
    }

    /// Replace the static override registry.
    pub fn with_overrides(mut self, overrides: StaticRegistry) -> Self {
        self.cache = ResolutionCache::new(self.cache.dynamic().clone(), overrides);
        self
    }

    pub fn state(&self) -> ResolverState {
        self.locator.state()
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    pub fn locator(&self) -> &ProviderLocator {
        &self.locator
    }

    pub fn uses_cache(&self) -> bool {
        self.use_cache
    }

    /// Add an entry to the dynamic cache by hand.
    pub fn insert_local(&self, name: impl Into<String>, address: Address) {
        self.cache.put(name, address);
    }

    /// Forget every dynamically cached resolution.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Node id of `name` after normalization. Needs no network.
    pub fn compute_node_id(&self, name: &str) -> Result<NodeId> {
        Ok(normal_namehash(name)?)
    }

    /// Resolve `name` to an address.
    ///
    /// Invalid names resolve to `None` without touching the network. Cached
    /// answers are served first (dynamic cache, then static overrides)
    /// unless caching is disabled. Network answers are written back to the
    /// dynamic cache when caching is on; absent names are not remembered.
    pub fn resolve(&mut self, name: &str, options: ResolveOptions) -> Result<Option<Address>> {
        if !is_valid_name(name) {
            debug!(%name, "not a resolvable name");
            return Ok(None);
        }

        let use_cache = options.use_cache.unwrap_or(self.use_cache);
        if use_cache {
            if let Some((address, tier)) = self.cache.get(name) {
                debug!(%name, ?tier, "resolved from cache");
                return Ok(Some(address));
            }
        }

        let (network, source) = self.lookup_source(options.registry_address.as_ref())?;
        let address = source
            .forward_lookup(name)
            .map_err(|err| ResolverError::from_lookup(network, err))?;
        self.locator.mark_active();

        if let Some(address) = address {
            if use_cache {
                self.cache.put(name, address);
            }
        }
        Ok(address)
    }

    /// Primary name of `address`. Never cached.
    pub fn reverse_resolve(
        &mut self,
        address: &Address,
        registry_address: Option<&Address>,
    ) -> Result<Option<String>> {
        let (network, source) = self.lookup_source(registry_address)?;
        let name = source
            .reverse_lookup(address)
            .map_err(|err| ResolverError::from_lookup(network, err))?;
        self.locator.mark_active();
        Ok(name)
    }

    /// Registry owner of `name`. Never cached.
    pub fn owner_of(
        &mut self,
        name: &str,
        registry_address: Option<&Address>,
    ) -> Result<Option<Address>> {
        if !is_valid_name(name) {
            debug!(%name, "not a resolvable name");
            return Ok(None);
        }

        let (network, source) = self.lookup_source(registry_address)?;
        let owner = source
            .owner_lookup(name)
            .map_err(|err| ResolverError::from_lookup(network, err))?;
        self.locator.mark_active();
        Ok(owner)
    }

    /// Best-effort check that `name` resolves to an address.
    ///
    /// Being on a network that cannot serve the registry counts as "no".
    /// Other failures are logged and also reported as `false`.
    pub fn can_resolve(&mut self, name: &str) -> bool {
        if !is_valid_name(name) {
            return false;
        }

        match self.resolve(name, ResolveOptions::default()) {
            Ok(address) => address.is_some(),
            Err(err) if err.is_unreachable() => {
                debug!(%name, error = %err, "name registry unreachable");
                false
            }
            Err(err) => {
                warn!(%name, error = %err, "name resolution failed");
                false
            }
        }
    }

    fn lookup_source(
        &mut self,
        registry_address: Option<&Address>,
    ) -> Result<(NetworkContext, Arc<dyn CanonicalLookupSource>)> {
        let handle = self.locator.canonical_provider()?;
        let network = handle.network();
        let registry = registry_address.or(self.registry_address.as_ref());
        let source = handle
            .provider()
            .lookup_source(registry)
            .map_err(|err| ResolverError::from_lookup(network.clone(), err))?;
        Ok((network, source))
    }
}
