//! Configuration types for Abide.
//!
//! The [`Config`] struct is persisted as TOML (typically at
//! `~/.config/abide/config.toml` on Unix systems).
//!
//! # Key Configuration Fields
//!
//! - `data_dir`: directory holding one `<key>.json` file per persisted key
//! - `sync_across_contexts`: whether bindings pick up writes made by other
//!   processes sharing `data_dir`
//! - `backup_dir`: default destination for exports
//! - `card_pool`: JSON file with the devotional card pool
//!
//! # Example
//!
//! ```ignore
//! use abide_core::config::Config;
//!
//! let config = Config::load()?;
//! let storage = DirectoryStorage::open(&config.data_dir)?;
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AbideError, Result};

fn default_sync() -> bool {
    true
}

/// User-configurable parts of Abide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory for the persisted keys.
    pub data_dir: PathBuf,

    /// Follow writes made by other processes sharing `data_dir`.
    #[serde(default = "default_sync")]
    pub sync_across_contexts: bool,

    /// Default directory for exported backups (falls back to the current directory).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,

    /// JSON file with the devotional card pool (falls back to the bundled pool).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_pool: Option<PathBuf>,
}

impl Config {
    /// Create a new config storing data in `data_dir`.
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            sync_across_contexts: true,
            backup_dir: None,
            card_pool: None,
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| AbideError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if needed
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Load config from a specific path, returning a default if it cannot be read.
    pub fn load_from_or_default(path: &Path, data_dir: PathBuf) -> Self {
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Using default config ({})", e);
                Self::new(data_dir)
            }
        }
    }
}

// ============================================================================
// Native-only implementation (not available in WASM)
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("abide");
        Self::new(data_dir)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Config {
    /// Get the config file path (~/.config/abide/config.toml)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("abide").join("config.toml"))
    }

    /// Load config from default location, or return default if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::config_path()
            && path.exists()
        {
            return Self::load_from(&path);
        }

        Ok(Config::default())
    }

    /// Save config to default location
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().ok_or(AbideError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Initialize and save a config storing data in `data_dir`.
    pub fn init(data_dir: PathBuf) -> Result<Self> {
        let config = Config::new(data_dir);
        config.save()?;
        Ok(config)
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for Config {
    fn default() -> Self {
        Self::new(PathBuf::from("/abide"))
    }
}
