use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::response::OutputFormat;
use crate::transaction::BroadcastMode;

pub const DEFAULT_HOME_DIR: &str = ".nftstaking";
pub const CONFIG_DIR: &str = "config";
pub const CLIENT_CONFIG_FILE: &str = "client.json";

pub const DEFAULT_CHAIN_ID: &str = "teritori-1";
pub const DEFAULT_NODE: &str = "http://localhost:26657";
pub const DEFAULT_BECH32_PREFIX: &str = "tori";
pub const DEFAULT_GAS: u64 = 200_000;

/// Keys accepted by `config set`.
pub const CONFIG_KEYS: &[&str] = &[
    "chain-id",
    "node",
    "broadcast-mode",
    "output",
    "bech32-prefix",
    "gas",
];

/// Persisted client settings. Flags and environment variables override them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub chain_id: String,
    pub node: String,
    pub broadcast_mode: BroadcastMode,
    pub output: OutputFormat,
    pub bech32_prefix: String,
    pub gas: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            chain_id: DEFAULT_CHAIN_ID.to_string(),
            node: DEFAULT_NODE.to_string(),
            broadcast_mode: BroadcastMode::default(),
            output: OutputFormat::default(),
            bech32_prefix: DEFAULT_BECH32_PREFIX.to_string(),
            gas: DEFAULT_GAS,
        }
    }
}

impl ClientConfig {
    pub fn path(home: &Path) -> PathBuf {
        home.join(CONFIG_DIR).join(CLIENT_CONFIG_FILE)
    }

    /// Load the config under `home`, falling back to defaults when the file
    /// does not exist.
    pub fn load(home: &Path) -> Result<Self, ConfigError> {
        let path = Self::path(home);
        if !path.exists() {
            debug!(path = %path.display(), "no client config, using defaults");
            return Ok(ClientConfig::default());
        }
        let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn save(&self, home: &Path) -> Result<(), ConfigError> {
        let path = Self::path(home);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| ConfigError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let raw = serde_json::to_string_pretty(self).map_err(ConfigError::Encode)?;
        fs::write(&path, raw).map_err(|source| ConfigError::Write { path, source })
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason,
        };
        match key {
            "chain-id" => self.chain_id = value.to_string(),
            "node" => self.node = value.to_string(),
            "broadcast-mode" => self.broadcast_mode = BroadcastMode::from_str(value, true).map_err(invalid)?,
            "output" => self.output = OutputFormat::from_str(value, true).map_err(invalid)?,
            "bech32-prefix" => {
                if value.is_empty() {
                    return Err(invalid("prefix cannot be empty".to_string()));
                }
                self.bech32_prefix = value.to_string()
            }
            "gas" => self.gas = value.parse().map_err(|e: std::num::ParseIntError| invalid(e.to_string()))?,
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

pub fn default_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_HOME_DIR)
}
