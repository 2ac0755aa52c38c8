//! Error types for name resolution

use ensgate_namehash::InvalidName;
use ensgate_types::{AddressError, NetworkContext};
use thiserror::Error;

/// Failures reported by a provider or its lookup source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The provider could not establish or keep its connection.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The endpoint cannot serve the request at all, e.g. it is not the
    /// network it claims to be or its head predates the registry.
    #[error("cannot handle request: {0}")]
    CannotHandleRequest(String),

    #[error("rpc error: {0}")]
    Rpc(String),

    /// The registry call returned data that does not decode, which is what
    /// calling a contract that is not deployed looks like.
    #[error("bad function call output: {0}")]
    BadCallOutput(String),
}

impl TransportError {
    /// Whether the failure means the registry itself is unusable on this
    /// endpoint, as opposed to a transient or routing problem.
    pub fn indicates_missing_registry(&self) -> bool {
        matches!(self, TransportError::Rpc(_) | TransportError::BadCallOutput(_))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file {0} not found")]
    FileNotFound(String),

    #[error("invalid address for '{key}': {source}")]
    InvalidAddress {
        key: String,
        #[source]
        source: AddressError,
    },

    #[error(transparent)]
    Source(#[from] config::ConfigError),
}

#[derive(Error, Debug)]
pub enum RecordBookError {
    #[error("failed to read record book: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse record book: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("provider '{name}' is declared twice for {network}")]
    DuplicateProvider { name: String, network: NetworkContext },
}

#[derive(Error, Debug)]
pub enum ResolverError {
    #[error(transparent)]
    InvalidName(#[from] InvalidName),

    #[error("no provider available for {network}: {reason}")]
    NoProviderAvailable {
        network: NetworkContext,
        reason: String,
        #[source]
        source: Option<TransportError>,
    },

    #[error("name registry is missing on {network}: {source}")]
    MissingRegistry {
        network: NetworkContext,
        #[source]
        source: TransportError,
    },

    #[error("transport error on {network}: {source}")]
    Transport {
        network: NetworkContext,
        #[source]
        source: TransportError,
    },

    #[error("unknown network {0}")]
    UnknownNetwork(NetworkContext),

    #[error("no provider named '{name}' on {network}")]
    UnknownProvider { name: String, network: NetworkContext },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("record book error: {0}")]
    RecordBook(#[from] RecordBookError),
}

impl ResolverError {
    /// Classify a lookup failure on `network`.
    pub fn from_lookup(network: NetworkContext, source: TransportError) -> Self {
        if source.indicates_missing_registry() {
            ResolverError::MissingRegistry { network, source }
        } else {
            ResolverError::Transport { network, source }
        }
    }

    /// Failures that mean "not on a network where this name can exist yet"
    /// rather than a broken setup.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            ResolverError::NoProviderAvailable { .. }
                | ResolverError::Transport {
                    source: TransportError::CannotHandleRequest(_),
                    ..
                }
        )
    }
}

pub type Result<T> = std::result::Result<T, ResolverError>;

/// Errors from [`crate::AddressConverter`].
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("'{0}' is neither an address nor a valid name")]
    NotConvertible(String),

    #[error("name '{0}' does not resolve to an address")]
    Unresolved(String),

    #[error(transparent)]
    Resolver(#[from] ResolverError),
}
