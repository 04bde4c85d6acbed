// src/models/fingerprint.rs

//! Content fingerprint value type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Hex digest of fetched content.
///
/// Two fingerprints are equal iff their digest strings are byte-equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wrap a digest string, trimming surrounding whitespace.
    pub fn new(digest: impl AsRef<str>) -> Self {
        Self(digest.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether the digest has the shape produced by `algorithm`.
    pub fn matches_algorithm(&self, algorithm: FingerprintAlgorithm) -> bool {
        self.0.len() == algorithm.hex_len() && self.0.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Digest algorithm used for fingerprints.
///
/// Fixed for the lifetime of a state file: switching invalidates history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintAlgorithm {
    #[default]
    Md5,
    Sha256,
}

impl FingerprintAlgorithm {
    /// Length of the hex-encoded digest.
    pub fn hex_len(&self) -> usize {
        match self {
            FingerprintAlgorithm::Md5 => 32,
            FingerprintAlgorithm::Sha256 => 64,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FingerprintAlgorithm::Md5 => "md5",
            FingerprintAlgorithm::Sha256 => "sha256",
        }
    }
}

impl FromStr for FingerprintAlgorithm {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "md5" => Ok(FingerprintAlgorithm::Md5),
            "sha256" | "sha-256" => Ok(FingerprintAlgorithm::Sha256),
            other => Err(AppError::config(format!(
                "Unknown fingerprint algorithm '{other}' (expected md5 or sha256)"
            ))),
        }
    }
}
