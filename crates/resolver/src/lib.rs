//! ENS name resolution engine.
//!
//! [`Resolver`] answers forward (`name → address`), reverse
//! (`address → name`) and owner queries against the canonical registry on
//! Ethereum mainnet. It locates a usable mainnet provider through
//! [`ProviderLocator`], reusing the active connection when it is already on
//! mainnet and opening a side connection otherwise, and keeps successful
//! forward resolutions in a [`DynamicCache`] layered over the configured
//! [`StaticRegistry`].

pub mod cache;
pub mod config;
pub mod converter;
pub mod errors;
pub mod locator;
pub mod network;
pub mod provider;
pub mod records;
pub mod resolver;

pub use cache::{CacheTier, DynamicCache, ResolutionCache, StaticRegistry};
pub use crate::config::ResolverConfig;
pub use converter::AddressConverter;
pub use errors::*;
pub use locator::{ProviderHandle, ProviderLocator, ResolverState};
pub use network::NetworkRegistry;
pub use provider::{CanonicalLookupSource, ConnectMode, Provider};
pub use records::{NameRecord, ProviderDecl, RecordBook, RecordBookProvider};
pub use resolver::{ResolveOptions, Resolver};

pub use ensgate_namehash::{is_valid_name, namehash, normal_namehash, InvalidName};
pub use ensgate_types::{Address, NetworkContext, NodeId};
