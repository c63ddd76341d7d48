//! Plugin configuration loaded from `config.toml` in the data directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use standvault_core::STORAGE_SLOTS;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Largest view the runtime can show (6 rows of 9).
pub const MAX_INVENTORY_ROWS: u32 = 6;

/// Message path for interactions in a disabled world.
pub const MSG_BLOCKED_WORLD: &str = "blocked-world";
/// Message path for interactions without the use permission.
pub const MSG_NO_PERMISSION: &str = "no-permission";

/// Errors parsing a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Not valid TOML or wrong value types.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Plugin configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Verbose logging.
    pub debug: bool,
    /// Worlds where the storage view never opens.
    pub disabled_worlds: Vec<String>,
    /// Storage view and database settings.
    pub storage: StorageConfig,
    /// Permission nodes.
    pub permissions: PermissionConfig,
    /// User-facing messages keyed by path (`blocked-world`, `no-permission`).
    pub messages: BTreeMap<String, String>,
}

/// `[storage]` table.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct StorageConfig {
    /// Title of the storage view.
    pub inventory_title: String,
    /// View height in rows of 9.
    pub inventory_rows: u32,
    /// Database file name inside the data directory.
    pub database_file: String,
    /// Turns to wait after enable before registering existing armor stands.
    pub startup_scan_delay_ticks: u64,
}

/// `[permissions]` table.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PermissionConfig {
    /// Permission node required to open the storage view.
    #[serde(rename = "use")]
    pub use_node: String,
}

impl Default for Config {
    fn default() -> Self {
        let messages = [
            (
                MSG_BLOCKED_WORLD,
                "Armor stand storage is disabled in this world.",
            ),
            (
                MSG_NO_PERMISSION,
                "You don't have permission to use armor stand storage.",
            ),
        ]
        .into_iter()
        .map(|(path, message)| (path.to_string(), message.to_string()))
        .collect();

        Self {
            debug: false,
            disabled_worlds: Vec::new(),
            storage: StorageConfig::default(),
            permissions: PermissionConfig::default(),
            messages,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            inventory_title: "Armor Stand Storage".to_string(),
            inventory_rows: 3,
            database_file: "armorstands.db".to_string(),
            startup_scan_delay_ticks: 20,
        }
    }
}

impl Default for PermissionConfig {
    fn default() -> Self {
        Self {
            use_node: "armorstandstorage.use".to_string(),
        }
    }
}

impl Config {
    /// Parse TOML text. An empty view title is replaced by the default one,
    /// since sessions are recognized by title.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(contents)?;
        if config.storage.inventory_title.is_empty() {
            warn!("storage.inventory-title is empty, using the default title");
            config.storage.inventory_title = StorageConfig::default().inventory_title;
        }
        Ok(config)
    }

    /// Load configuration from `path`, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => config,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    Config::default()
                }
            },
            Err(err) => {
                warn!("Failed to read {}: {err}. Using defaults", path.display());
                Config::default()
            }
        }
    }

    /// Save configuration to `path`.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Write the default config to `path` unless a file is already there.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if path.exists() {
            return Ok(());
        }
        Config::default().save_to_path(path)
    }

    /// Configured message for `path`.
    pub fn message(&self, path: &str) -> String {
        self.messages
            .get(path)
            .cloned()
            .unwrap_or_else(|| format!("Message not found: {path}"))
    }

    /// Whether the storage view is disabled in `world`.
    pub fn is_world_disabled(&self, world: &str) -> bool {
        self.disabled_worlds.iter().any(|disabled| disabled == world)
    }

    /// Storage view size: configured rows of 9, clamped to the runtime
    /// maximum and never smaller than the persisted slot count.
    pub fn view_size(&self) -> usize {
        let rows = self.storage.inventory_rows.clamp(1, MAX_INVENTORY_ROWS) as usize;
        (rows * 9).max(STORAGE_SLOTS)
    }
}
