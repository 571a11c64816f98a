//! Configuration management for GuardVision.
//!
//! Configuration is loaded from `~/.guardvision/config.toml` (or the platform
//! config directory) with sensible defaults. Vendor secrets are stored as
//! `${ENV_VAR}` references and resolved only when a request needs them.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for GuardVision.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP API listener settings
    pub server: ServerConfig,

    /// Where the terminal front end finds the HTTP API
    pub client: ClientConfig,

    /// Outbound vendor request settings
    pub http: HttpConfig,

    /// Prompt settings for analysis vendors
    pub analysis: AnalysisConfig,

    /// Company terminology list
    pub terminology: TerminologyConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Per-vendor endpoints, models and credentials
    pub vendors: VendorsConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.guardvision.guardvision/config.toml
    /// - Linux: ~/.config/guardvision/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\guardvision\config\config.toml
    ///
    /// Falls back to ~/.guardvision/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "guardvision", "guardvision")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".guardvision").join("config.toml")
            })
    }

    /// Resolved terminology file path (with ~ expansion), if one is configured.
    pub fn terminology_path(&self) -> Option<PathBuf> {
        self.terminology
            .path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| PathBuf::from(shellexpand::tilde(p).into_owned()))
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
