use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::{DurableStore, FileStore, MemoryStore, StoreError};

/// Names a JSON config file to load.
pub const CONFIG_ENV: &str = "STOREFRONT_CONFIG";
/// Overrides `data_dir`.
pub const DATA_DIR_ENV: &str = "STOREFRONT_DATA_DIR";
/// Overrides `log_filter`. `RUST_LOG` still wins when set.
pub const LOG_ENV: &str = "STOREFRONT_LOG";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {message}")]
    Read { path: String, message: String },
    #[error("Cannot parse config: {0}")]
    Parse(String),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Runtime settings for the storefront system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemConfig {
    /// Directory for the file store. `None` keeps everything in memory.
    pub data_dir: Option<PathBuf>,
    /// Request buffer of the service channel.
    pub channel_capacity: usize,
    /// Fallback tracing filter.
    pub log_filter: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            channel_capacity: 100,
            log_filter: "info".to_string(),
        }
    }
}

impl SystemConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&raw)
    }

    /// Builds the config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source: the file named by
    /// [`CONFIG_ENV`] (if any), then the individual overrides.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup(CONFIG_ENV) {
            Some(path) => Self::load_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|dir| !dir.is_empty()) {
            config.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(filter) = lookup(LOG_ENV).filter(|filter| !filter.is_empty()) {
            config.log_filter = filter;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "channel_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Opens the store this config points at.
    pub fn open_store(&self) -> Result<Arc<dyn DurableStore>, StoreError> {
        match &self.data_dir {
            Some(dir) => Ok(Arc::new(FileStore::open(dir)?)),
            None => Ok(Arc::new(MemoryStore::new())),
        }
    }
}
