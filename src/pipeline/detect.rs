//! Change detection.
//!
//! Pure classification of a check cycle from the stored and current
//! fingerprints. No I/O.

use crate::models::{CheckOutcome, Fingerprint};

/// True iff a previous fingerprint exists and differs from `current`.
pub fn has_changed(previous: Option<&Fingerprint>, current: &Fingerprint) -> bool {
    previous.is_some_and(|prev| prev != current)
}

/// True iff nothing was stored before.
pub fn is_first_check(previous: Option<&Fingerprint>) -> bool {
    previous.is_none()
}

/// Classify a cycle.
///
/// `has_changed` is checked first, then `is_first_check`, then the cycle
/// defaults to `Unchanged`.
pub fn classify(previous: Option<&Fingerprint>, current: &Fingerprint) -> CheckOutcome {
    if has_changed(previous, current) {
        CheckOutcome::Changed
    } else if is_first_check(previous) {
        CheckOutcome::FirstObservation
    } else {
        CheckOutcome::Unchanged
    }
}
