//! SDK configuration.
//!
//! [`Config`] is built once by the caller (programmatically, from JSON, or from
//! environment variables) and handed to the components that need it.

use crate::error::{Error, Result};
use crate::types::Network;
use bitcoin::bip32::DerivationPath;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Explorer used when none is configured.
pub const DEFAULT_EXPLORER_URL: &str = "https://testnet.litecore.io/api";

/// BIP-44 path of the first receive address (coin type 1, testnet).
pub const DEFAULT_DERIVATION_PATH: &str = "m/44'/1'/0'/0/0";

/// Environment variable selecting the network.
pub const ENV_NETWORK: &str = "LTC_NETWORK";
/// Environment variable with the explorer base URL.
pub const ENV_EXPLORER_URL: &str = "LTC_EXPLORER_URL";
/// Environment variable with the derivation path.
pub const ENV_DERIVATION_PATH: &str = "LTC_DERIVATION_PATH";

/// Serde module for `DerivationPath` as its string form.
mod path_string {
    use bitcoin::bip32::DerivationPath;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S>(path: &DerivationPath, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::path_to_string(path))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DerivationPath, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DerivationPath::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Process-wide, read-only configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Network used when a call does not name one.
    pub network: Network,
    /// Base URL of the Insight-style explorer API.
    pub explorer_url: String,
    /// Path of the wallet key below the BIP-32 master key.
    #[serde(with = "path_string")]
    pub derivation_path: DerivationPath,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: Network::Testnet,
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
            derivation_path: default_path(),
        }
    }
}

impl Config {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            ..Default::default()
        }
    }

    pub fn with_explorer_url(mut self, url: impl Into<String>) -> Result<Self> {
        self.explorer_url = url.into();
        self.validate()?;
        Ok(self)
    }

    pub fn with_derivation_path(mut self, path: &str) -> Result<Self> {
        self.derivation_path = parse_path(path)?;
        Ok(self)
    }

    /// Load a configuration from a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from `LTC_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load a configuration from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(network) = lookup(ENV_NETWORK) {
            config.network = Network::from_str(&network)
                .map_err(|e| Error::Config(format!("{ENV_NETWORK}: {e}")))?;
        }
        if let Some(url) = lookup(ENV_EXPLORER_URL) {
            config.explorer_url = url;
        }
        if let Some(path) = lookup(ENV_DERIVATION_PATH) {
            config.derivation_path = parse_path(&path)?;
        }

        config.validate()?;
        log::debug!(
            "Loaded config: network={}, explorer={}, path={}",
            config.network,
            config.explorer_url,
            path_to_string(&config.derivation_path)
        );
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let url = self.explorer_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "Explorer URL must be http(s): {}",
                self.explorer_url
            )));
        }
        Ok(())
    }
}

fn default_path() -> DerivationPath {
    // The constant is a well-formed path; an empty path is the unreachable fallback.
    DerivationPath::from_str(DEFAULT_DERIVATION_PATH).unwrap_or_else(|_| DerivationPath::master())
}

/// Render a path with the explicit `m/` prefix.
pub fn path_to_string(path: &DerivationPath) -> String {
    let children: Vec<String> = path.into_iter().map(|c| c.to_string()).collect();
    if children.is_empty() {
        "m".to_string()
    } else {
        format!("m/{}", children.join("/"))
    }
}

fn parse_path(path: &str) -> Result<DerivationPath> {
    DerivationPath::from_str(path)
        .map_err(|e| Error::Config(format!("Invalid derivation path {path}: {e}")))
}
