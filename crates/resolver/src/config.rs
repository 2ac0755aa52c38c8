//! Resolver configuration.
//!
//! Loaded from an optional TOML file layered under `ENSGATE_*` environment
//! variables:
//!
//! ```toml
//! use_cache = true
//! registry_address = "0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e"
//!
//! [registry]
//! "vitalik.eth" = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"
//! ```

use crate::cache::StaticRegistry;
use crate::errors::ConfigError;
use config::{Config, Environment, File as ConfigFile};
use ensgate_types::{decode_address, Address};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const ENV_PREFIX: &str = "ENSGATE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Set to `false` to never cache resolutions and always ask the network.
    pub use_cache: bool,

    /// Hardcoded name → address entries. They are answered without a
    /// network connection, which also makes them useful for testing.
    pub registry: BTreeMap<String, String>,

    /// Alternate registry deployment to bind to instead of the canonical one.
    pub registry_address: Option<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            use_cache: true,
            registry: BTreeMap::new(),
            registry_address: None,
        }
    }
}

impl ResolverConfig {
    /// Load from `path` (if given) and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.display().to_string()));
            }
            builder = builder.add_source(ConfigFile::from(path));
        }

        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Parse the `registry` table into a [`StaticRegistry`].
    pub fn static_registry(&self) -> Result<StaticRegistry, ConfigError> {
        self.registry
            .iter()
            .map(|(name, value)| {
                decode_address(value)
                    .map(|address| (name.clone(), address))
                    .map_err(|source| ConfigError::InvalidAddress {
                        key: format!("registry.{name}"),
                        source,
                    })
            })
            .collect()
    }

    pub fn registry_address(&self) -> Result<Option<Address>, ConfigError> {
        self.registry_address
            .as_deref()
            .map(|value| {
                decode_address(value).map_err(|source| ConfigError::InvalidAddress {
                    key: "registry_address".to_string(),
                    source,
                })
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_enable_cache() {
        let config = ResolverConfig::default();
        assert!(config.use_cache);
        assert!(config.registry.is_empty());
        assert_eq!(config.registry_address().unwrap(), None);
    }

    #[test]
    fn loads_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
use_cache = false
registry_address = "0x00000000000c2e074ec69a0dfb2997ba6c7d2e1e"

[registry]
"vitalik.eth" = "0xd8da6bf26964af9d7eed9e03e53415d37aa96045"
"#
        )
        .unwrap();

        let config = ResolverConfig::load(Some(file.path())).unwrap();
        assert!(!config.use_cache);

        let registry = config.static_registry().unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("vitalik.eth").unwrap().to_string(),
            "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"
        );
        assert!(config.registry_address().unwrap().is_some());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = ResolverConfig::load(Some(Path::new("/nonexistent/ensgate.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn bad_registry_address_names_the_key() {
        let mut config = ResolverConfig::default();
        config.registry.insert("bad.eth".into(), "0x1234".into());

        let err = config.static_registry().unwrap_err();
        match err {
            ConfigError::InvalidAddress { key, .. } => assert_eq!(key, "registry.bad.eth"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
