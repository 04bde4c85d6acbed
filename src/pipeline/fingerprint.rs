//! Fingerprint calculation over fetched content.
//!
//! The digest covers exactly the fetched bytes: no normalization, no
//! decoding. Any change in the payload yields a new fingerprint.

use md5::Md5;
use sha2::{Digest, Sha256};

use crate::models::{Fingerprint, FingerprintAlgorithm};

/// Calculator reducing content to a fixed-length hex digest.
#[derive(Debug, Clone, Copy, Default)]
pub struct FingerprintCalculator {
    algorithm: FingerprintAlgorithm,
}

impl FingerprintCalculator {
    pub fn new(algorithm: FingerprintAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> FingerprintAlgorithm {
        self.algorithm
    }

    /// Compute the fingerprint of `content`. Total over all inputs.
    pub fn calculate(&self, content: &[u8]) -> Fingerprint {
        let digest = match self.algorithm {
            FingerprintAlgorithm::Md5 => hex::encode(Md5::digest(content)),
            FingerprintAlgorithm::Sha256 => hex::encode(Sha256::digest(content)),
        };
        Fingerprint::new(digest)
    }
}

/// Convenience function using the default (MD5) algorithm.
pub fn calculate_fingerprint(content: &[u8]) -> Fingerprint {
    FingerprintCalculator::default().calculate(content)
}
