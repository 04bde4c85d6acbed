// src/models/mod.rs

//! Domain models for the page watcher.
//!
//! This module contains the data structures shared across the pipeline,
//! organized by their primary purpose.

mod config;
mod fingerprint;
mod notification;
mod outcome;

// Re-export all public types
pub use config::{Config, FetcherConfig, FingerprintConfig, HeartbeatConfig, StateConfig};
pub use fingerprint::{Fingerprint, FingerprintAlgorithm};
pub use notification::NotificationPayload;
pub use outcome::{CheckOutcome, CheckReport, NotificationStatus};
