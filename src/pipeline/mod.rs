//! Change-detection pipeline.
//!
//! - `fingerprint`: reduce content to a digest
//! - `detect`: classify a cycle from stored and current digests
//! - `check`: the orchestrator driving one cycle
//! - `heartbeat`: optional liveness ping on quiet runs
//! - `run_check`: entry point wiring HTTP and file-backed services

pub mod check;
pub mod detect;
pub mod fingerprint;
pub mod heartbeat;
pub mod run;

pub use check::Checker;
pub use detect::{classify, has_changed, is_first_check};
pub use fingerprint::{FingerprintCalculator, calculate_fingerprint};
pub use heartbeat::{heartbeat_due, run_heartbeat};
pub use run::run_check;
