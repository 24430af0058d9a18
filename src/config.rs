//! User configuration for the calculator

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::feed::{HttpPriceFeed, PriceFeed, SnapshotFeed};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub price_feed_url: String,
    pub app_id: u32,
    pub currency: String,
    /// Read prices from this SQLite snapshot instead of the network.
    pub snapshot_db: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub filter_debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            price_feed_url: "https://api.skinport.com/v1/items".to_string(),
            app_id: 730,
            currency: "USD".to_string(),
            snapshot_db: None,
            request_timeout_secs: 15,
            filter_debounce_ms: 40,
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("skin_calculator");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from the default location, or defaults if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&contents).context("Failed to parse config file")
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.filter_debounce_ms)
    }

    pub fn price_feed(&self) -> Arc<dyn PriceFeed> {
        match &self.snapshot_db {
            Some(path) => Arc::new(SnapshotFeed::new(path.clone())),
            None => Arc::new(HttpPriceFeed::new(
                self.price_feed_url.clone(),
                Duration::from_secs(self.request_timeout_secs),
            )),
        }
    }
}
