//! Storage abstractions for check state persistence.
//!
//! Each state file holds a single value and is overwritten whole:
//!
//! ```text
//! .checksum     # last-seen fingerprint, e.g. "5d41402abc4b2a76b9719d911017c592"
//! .heartbeat    # last liveness ping, e.g. "2026-01-05T08:00:00+00:00"
//! ```
//!
//! Invocations against the same files are expected not to overlap; there is
//! no locking and the last writer wins.

pub mod heartbeat;
pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Fingerprint;

// Re-export for convenience
pub use heartbeat::HeartbeatStore;
pub use local::FileStateStore;

/// Trait for last-seen fingerprint storage backends.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read the stored fingerprint. `None` means no prior observation.
    async fn read(&self) -> Result<Option<Fingerprint>>;

    /// Replace the stored fingerprint.
    async fn write(&self, fingerprint: &Fingerprint) -> Result<()>;

    /// Human-readable location for log output.
    fn location(&self) -> String;
}
