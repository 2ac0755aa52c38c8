//! Two-tier resolution cache.
//!
//! Lookups consult the dynamic cache first and the static override registry
//! second. Only the dynamic tier is ever written, and nothing expires on its
//! own: entries stay until the owner clears them.

use ensgate_types::Address;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Mutable name → address cache.
///
/// Cloning yields another handle to the same entries, which is how several
/// resolvers share one cache.
#[derive(Debug, Clone, Default)]
pub struct DynamicCache {
    entries: Arc<RwLock<HashMap<String, Address>>>,
}

impl DynamicCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Address> {
        self.entries.read().get(name).copied()
    }

    pub fn insert(&self, name: impl Into<String>, address: Address) -> Option<Address> {
        self.entries.write().insert(name.into(), address)
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Sorted copy of the current entries.
    pub fn snapshot(&self) -> BTreeMap<String, Address> {
        self.entries
            .read()
            .iter()
            .map(|(name, address)| (name.clone(), *address))
            .collect()
    }

    /// Whether both handles point at the same entries.
    pub fn shares_with(&self, other: &DynamicCache) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

/// Read-only name → address overrides supplied at configuration time.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    entries: Arc<HashMap<String, Address>>,
}

impl StaticRegistry {
    pub fn new(entries: HashMap<String, Address>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }

    pub fn get(&self, name: &str) -> Option<Address> {
        self.entries.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Address)> for StaticRegistry {
    fn from_iter<T: IntoIterator<Item = (String, Address)>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Which tier answered a cache lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTier {
    Dynamic,
    Static,
}

/// Dynamic cache layered over the static override registry.
#[derive(Debug, Clone, Default)]
pub struct ResolutionCache {
    dynamic: DynamicCache,
    overrides: StaticRegistry,
}

impl ResolutionCache {
    pub fn new(dynamic: DynamicCache, overrides: StaticRegistry) -> Self {
        Self { dynamic, overrides }
    }

    pub fn get(&self, name: &str) -> Option<(Address, CacheTier)> {
        if let Some(address) = self.dynamic.get(name) {
            return Some((address, CacheTier::Dynamic));
        }
        self.overrides
            .get(name)
            .map(|address| (address, CacheTier::Static))
    }

    /// Write to the dynamic tier.
    pub fn put(&self, name: impl Into<String>, address: Address) {
        self.dynamic.insert(name, address);
    }

    /// Clear the dynamic tier. The static overrides are untouched.
    pub fn clear(&self) {
        self.dynamic.clear();
    }

    pub fn dynamic(&self) -> &DynamicCache {
        &self.dynamic
    }

    pub fn overrides(&self) -> &StaticRegistry {
        &self.overrides
    }
}
