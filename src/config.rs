//! Config module - Manages chatview configuration (chatview.toml).
//!
//! Configuration file contains:
//! - Store registry (logical name -> database path)
//! - Default store name
//! - HTTP server bind address

use crate::locator::StoreRegistry;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5001
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Main chatview configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Store used when a request does not name one
    #[serde(default = "default_store_name")]
    pub default_store: String,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Logical store name -> database file
    #[serde(default = "default_stores")]
    pub stores: BTreeMap<String, PathBuf>,
}

fn default_store_name() -> String {
    "main".to_string()
}

fn default_stores() -> BTreeMap<String, PathBuf> {
    BTreeMap::from([(default_store_name(), default_store_path())])
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_store: default_store_name(),
            server: ServerConfig::default(),
            stores: default_stores(),
        }
    }
}

/// Get default database path (Open WebUI data directory).
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("open-webui").join("webui.db"))
        .unwrap_or_else(|| PathBuf::from("./webui.db"))
}

/// Get default config directory (~/.config/chatview/).
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("chatview"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get default config file path.
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("chatview.toml")
}

impl Config {
    /// Create new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Cannot parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load config from `path`, falling back to defaults if it is absent.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write a default config to `path`.
    ///
    /// Returns `false` without touching the file if it exists and `force`
    /// is not set.
    pub fn init(path: &Path, force: bool) -> Result<bool> {
        if path.exists() && !force {
            return Ok(false);
        }
        Self::default().save(path)?;
        Ok(true)
    }

    /// Save config to file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).with_context(|| "Cannot serialize config to TOML")?;

        std::fs::write(path, content)
            .with_context(|| format!("Cannot write config file: {}", path.display()))?;

        // Store paths may point at private data
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// Immutable store registry for the locator.
    pub fn registry(&self) -> StoreRegistry {
        StoreRegistry::new(self.stores.clone())
    }
}
