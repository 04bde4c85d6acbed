// src/models/outcome.rs

//! Check outcome and run report.

use std::fmt;

use serde::Serialize;

use super::Fingerprint;

/// Classification of one check cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CheckOutcome {
    /// No previous fingerprint was stored
    FirstObservation,
    /// Stored fingerprint differs from the current one
    Changed,
    /// Stored fingerprint equals the current one
    Unchanged,
}

impl CheckOutcome {
    /// Process exit code: 1 for a detected change, 0 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            CheckOutcome::Changed => 1,
            CheckOutcome::FirstObservation | CheckOutcome::Unchanged => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckOutcome::FirstObservation => "first observation",
            CheckOutcome::Changed => "changed",
            CheckOutcome::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to the notification step of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NotificationStatus {
    /// Outcome did not call for a notification
    NotRequired,
    /// A change was detected but no notifier is configured
    Disabled,
    /// Delivery was confirmed
    Sent,
    /// Delivery was attempted and failed, or the notifier was misconfigured
    Failed,
}

/// Everything a single check did.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub url: String,
    pub outcome: CheckOutcome,
    pub previous: Option<Fingerprint>,
    pub current: Fingerprint,
    /// `None` when no write was needed, otherwise whether it succeeded
    pub state_written: Option<bool>,
    pub notification: NotificationStatus,
    pub timestamp: String,
}

impl CheckReport {
    /// Exit code is driven by the outcome alone.
    pub fn exit_code(&self) -> i32 {
        self.outcome.exit_code()
    }

    /// True if a needed state write did not succeed.
    pub fn state_write_failed(&self) -> bool {
        self.state_written == Some(false)
    }
}
