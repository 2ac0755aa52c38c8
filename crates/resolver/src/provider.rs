//! Provider and lookup-source abstractions.
//!
//! A [`Provider`] is a connection to one network. When it can answer name
//! lookups it hands out a [`CanonicalLookupSource`]; every concrete lookup
//! strategy (native provider ENS support, raw registry contract calls, an
//! external RPC endpoint) sits behind that one trait.

use crate::errors::TransportError;
use ensgate_types::{Address, NetworkContext};
use std::sync::Arc;

/// How loudly a provider should connect.
///
/// Probing candidates is done quietly so that failed attempts do not spam
/// the caller's log; the provider decides what "quiet" means for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectMode {
    #[default]
    Verbose,
    Quiet,
}

impl ConnectMode {
    pub fn is_quiet(self) -> bool {
        matches!(self, ConnectMode::Quiet)
    }
}

/// The three remote lookups the resolver depends on.
pub trait CanonicalLookupSource: Send + Sync {
    /// Address the name points at, `None` when the name has no address.
    fn forward_lookup(&self, name: &str) -> Result<Option<Address>, TransportError>;

    /// Primary name of `address`, `None` when no reverse record exists.
    fn reverse_lookup(&self, address: &Address) -> Result<Option<String>, TransportError>;

    /// Owner of the name in the registry.
    fn owner_lookup(&self, name: &str) -> Result<Option<Address>, TransportError>;
}

/// A connection to a single network.
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;

    fn network(&self) -> NetworkContext;

    fn connect(&self, mode: ConnectMode) -> Result<(), TransportError>;

    fn disconnect(&self);

    fn is_connected(&self) -> bool;

    /// Whether this provider can serve name lookups at all. Checked before
    /// connecting, so it must not depend on connection state.
    fn supports_lookups(&self) -> bool;

    /// Lookup source bound to `registry`, or to the provider's default
    /// registry deployment when `None`.
    fn lookup_source(
        &self,
        registry: Option<&Address>,
    ) -> Result<Arc<dyn CanonicalLookupSource>, TransportError>;
}

/// Identity comparison for shared providers.
pub(crate) fn same_provider(a: &Arc<dyn Provider>, b: &Arc<dyn Provider>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}
