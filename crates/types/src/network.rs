use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ecosystem hosting the canonical name registry.
pub const CANONICAL_ECOSYSTEM: &str = "ethereum";
/// Network hosting the canonical name registry.
pub const CANONICAL_NETWORK: &str = "mainnet";
/// Local fork of the canonical network; it carries the same registry state.
pub const CANONICAL_FORK_NETWORK: &str = "mainnet-fork";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid network choice '{0}', expected 'ecosystem:network'")]
pub struct NetworkParseError(pub String);

/// An `ecosystem:network` pair, e.g. `ethereum:mainnet`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NetworkContext {
    pub ecosystem: String,
    pub network: String,
}

impl NetworkContext {
    pub fn new(ecosystem: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            ecosystem: ecosystem.into(),
            network: network.into(),
        }
    }

    /// `ethereum:mainnet`.
    pub fn canonical() -> Self {
        Self::new(CANONICAL_ECOSYSTEM, CANONICAL_NETWORK)
    }

    /// `ethereum:mainnet-fork`.
    pub fn canonical_fork() -> Self {
        Self::new(CANONICAL_ECOSYSTEM, CANONICAL_FORK_NETWORK)
    }

    /// True for the canonical network or its accepted fork variant.
    pub fn is_canonical(&self) -> bool {
        self.ecosystem == CANONICAL_ECOSYSTEM
            && (self.network == CANONICAL_NETWORK || self.network == CANONICAL_FORK_NETWORK)
    }
}

impl fmt::Display for NetworkContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ecosystem, self.network)
    }
}

impl FromStr for NetworkContext {
    type Err = NetworkParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ecosystem, network) = s
            .split_once(':')
            .ok_or_else(|| NetworkParseError(s.to_string()))?;
        let (ecosystem, network) = (ecosystem.trim(), network.trim());
        if ecosystem.is_empty() || network.is_empty() || network.contains(':') {
            return Err(NetworkParseError(s.to_string()));
        }
        Ok(Self::new(ecosystem, network))
    }
}

impl From<NetworkContext> for String {
    fn from(value: NetworkContext) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for NetworkContext {
    type Error = NetworkParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
