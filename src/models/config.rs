//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

use super::FingerprintAlgorithm;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP fetch behavior settings
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Persisted state file locations
    #[serde(default)]
    pub state: StateConfig,

    /// Digest settings
    #[serde(default)]
    pub fingerprint: FingerprintConfig,

    /// Optional liveness ping
    #[serde(default)]
    pub heartbeat: HeartbeatConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if the file is missing.
    ///
    /// A file that exists but does not parse is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No config file at {:?}. Using defaults.", path);
            return Ok(Self::default());
        }
        Self::load(path)
            .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetcher.user_agent.trim().is_empty() {
            return Err(AppError::config("fetcher.user_agent is empty"));
        }
        if self.fetcher.timeout_secs == 0 {
            return Err(AppError::config("fetcher.timeout_secs must be > 0"));
        }
        if self.state.checksum_file.as_os_str().is_empty() {
            return Err(AppError::config("state.checksum_file is empty"));
        }
        if self.state.checksum_file == self.state.heartbeat_file {
            return Err(AppError::config(
                "state.checksum_file and state.heartbeat_file must differ",
            ));
        }
        if self.heartbeat.interval_days == Some(0) {
            return Err(AppError::config("heartbeat.interval_days must be > 0"));
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// State file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// File holding the last-seen fingerprint
    #[serde(default = "defaults::checksum_file")]
    pub checksum_file: PathBuf,

    /// File holding the last heartbeat timestamp
    #[serde(default = "defaults::heartbeat_file")]
    pub heartbeat_file: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            checksum_file: defaults::checksum_file(),
            heartbeat_file: defaults::heartbeat_file(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FingerprintConfig {
    #[serde(default)]
    pub algorithm: FingerprintAlgorithm,
}

/// Liveness ping cadence. Disabled when `interval_days` is unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeartbeatConfig {
    #[serde(default)]
    pub interval_days: Option<u32>,
}

mod defaults {
    use std::path::PathBuf;

    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; pagewatch/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn checksum_file() -> PathBuf {
        PathBuf::from(".checksum")
    }
    pub fn heartbeat_file() -> PathBuf {
        PathBuf::from(".heartbeat")
    }
}
