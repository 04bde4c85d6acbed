// src/error.rs

//! Unified error handling for the page watcher.

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Exit code for operational failures (distinct from "content changed").
pub const FAILURE_EXIT_CODE: i32 = 2;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Target URL missing or malformed
    #[error("Invalid target URL '{url}': {reason}")]
    InvalidTarget { url: String, reason: String },

    /// Content could not be retrieved
    #[error("Failed to fetch {url}: {cause}")]
    FetchFailed { url: String, cause: String },

    /// Existing state file could not be read
    #[error("Failed to read state from {path}: {source}")]
    StateReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// State file could not be written
    #[error("Failed to write state to {path}: {source}")]
    StateWriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Notification misconfigured or not delivered
    #[error("Notification failed ({channel}): {message}")]
    NotificationFailed { channel: String, message: String },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Create an invalid target error.
    pub fn invalid_target(url: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::InvalidTarget {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a fetch error carrying the url and underlying cause.
    pub fn fetch(url: impl Into<String>, cause: impl fmt::Display) -> Self {
        Self::FetchFailed {
            url: url.into(),
            cause: cause.to_string(),
        }
    }

    /// Create a state read error.
    pub fn state_read(path: &Path, source: std::io::Error) -> Self {
        Self::StateReadFailed {
            path: path.display().to_string(),
            source,
        }
    }

    /// Create a state write error.
    pub fn state_write(path: &Path, source: std::io::Error) -> Self {
        Self::StateWriteFailed {
            path: path.display().to_string(),
            source,
        }
    }

    /// Create a notification error for the given channel.
    pub fn notification(channel: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::NotificationFailed {
            channel: channel.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Process exit code when this error ends a run.
    pub fn exit_code(&self) -> i32 {
        FAILURE_EXIT_CODE
    }
}
