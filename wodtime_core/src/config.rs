//! Configuration file support for wodtime.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/wodtime/config.toml`.

use crate::{Error, RestSettings, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    /// Rest seconds per effort level
    #[serde(default)]
    pub rest: RestSettings,
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));
        base.join("wodtime").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reject rest times that cannot be right
    fn validate(&self) -> Result<()> {
        let rest = &self.rest;
        let fields = [
            ("low", rest.low),
            ("medium", rest.medium),
            ("high", rest.high),
            ("vigorous", rest.vigorous),
        ];

        for (name, value) in fields {
            if let Some(seconds) = value {
                if !seconds.is_finite() || seconds < 0.0 {
                    return Err(Error::Config(format!(
                        "rest.{} must be a non-negative number of seconds, got {}",
                        name, seconds
                    )));
                }
            }
        }
        Ok(())
    }
}
