//! Configuration handling for the Waybar widgets
//!
//! Compiled-in defaults cover a stock Mullvad install; a TOML file at
//! `~/.config/mullvad-waybar/config.toml` overrides them. Every widget
//! invocation is a fresh process, so the config is read once per run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Mullvad CLI binary. A bare name is resolved through PATH.
    pub mullvad_bin: String,
    /// Send a desktop notification after a successful connect.
    pub notifications: bool,
    pub timeouts: Timeouts,
}

/// Per-step subprocess bounds, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// `mullvad status`.
    pub status_secs: u64,
    /// `mullvad disconnect`.
    pub control_secs: u64,
    /// `mullvad relay set location`.
    pub set_location_secs: u64,
    /// `mullvad connect`. Connection negotiation is slower than queries.
    pub connect_secs: u64,
    /// Pause between disconnect and reconfigure, letting the client
    /// finish tearing down the old tunnel.
    pub settle_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mullvad_bin: "mullvad".to_string(),
            notifications: true,
            timeouts: Timeouts::default(),
        }
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            status_secs: 10,
            control_secs: 10,
            set_location_secs: 15,
            connect_secs: 30,
            settle_secs: 2,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Default config file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mullvad-waybar").join("config.toml"))
    }

    /// Load the user's config, falling back to defaults when the file is
    /// absent or unreadable. Widgets must render something either way.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => config,
            Err(error) => {
                warn!("Ignoring config at {}: {}", path.display(), error);
                Self::default()
            }
        }
    }

    /// Settling delay between disconnect and reconfigure.
    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.timeouts.settle_secs)
    }
}
