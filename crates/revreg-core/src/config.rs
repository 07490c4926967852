//! Client configuration loading and management.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CoreError;

/// Environment variable overriding the node endpoint.
pub const ENV_ENDPOINT: &str = "FullNodeEndpoint";
/// Environment variable overriding the keyring key type.
pub const ENV_KEY_TYPE: &str = "TestKeyringType";
/// Environment variable overriding the submitting account URI.
pub const ENV_ACCOUNT_URI: &str = "TestAccountURI";

/// Full configuration for a registry client.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClientConfig {
    /// Ledger node connection.
    #[serde(default)]
    pub node: NodeConfig,

    /// Keyring of the account paying for transactions.
    #[serde(default)]
    pub keyring: KeyringConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Full node websocket endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyringConfig {
    /// Key type of the submitting account (ed25519, secp256k1).
    #[serde(default = "default_key_type")]
    pub key_type: String,
    /// Secret URI of the submitting account.
    #[serde(default = "default_account_uri")]
    pub account_uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_endpoint() -> String {
    "ws://localhost:9944".into()
}
fn default_key_type() -> String {
    "ed25519".into()
}
fn default_account_uri() -> String {
    "//Alice".into()
}
fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "text".into()
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}

impl Default for KeyringConfig {
    fn default() -> Self {
        Self {
            key_type: default_key_type(),
            account_uri: default_account_uri(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ClientConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("reading {}: {}", path.display(), e)))?;
        Self::from_toml(&contents)
    }

    /// Parse config from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self, CoreError> {
        toml::from_str(contents).map_err(|e| CoreError::Config(e.to_string()))
    }

    /// Save the current config to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| CoreError::Config(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CoreError::Config(format!("creating {}: {}", parent.display(), e)))?;
        }
        std::fs::write(path, contents)
            .map_err(|e| CoreError::Config(format!("writing {}: {}", path.display(), e)))
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.node.endpoint = endpoint;
        }
        if let Some(key_type) = lookup(ENV_KEY_TYPE) {
            self.keyring.key_type = key_type;
        }
        if let Some(uri) = lookup(ENV_ACCOUNT_URI) {
            self.keyring.account_uri = uri;
        }
    }
}
