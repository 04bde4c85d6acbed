// src/pipeline/check.rs

//! Change-detection orchestrator.
//!
//! One run walks `Start → Fetched → Fingerprinted → outcome → Done`.
//! Validation and fetch errors abort the run. State-write and notification
//! failures are downgraded to log output so the outcome, and with it the
//! exit code, stays reliable.

use chrono::Local;

use crate::error::Result;
use crate::models::{CheckOutcome, CheckReport, Fingerprint, NotificationStatus};
use crate::services::formatter::{TIMESTAMP_FORMAT, format_change};
use crate::services::{Notifier, PageSource};
use crate::storage::StateStore;
use crate::utils::{log, parse_target};

use super::detect::classify;
use super::fingerprint::FingerprintCalculator;

const TOTAL_STEPS: usize = 4;

/// Sequences fetch, fingerprint, compare, persist and notify.
pub struct Checker<'a> {
    source: &'a dyn PageSource,
    store: &'a dyn StateStore,
    calculator: FingerprintCalculator,
    notifier: Option<&'a dyn Notifier>,
}

impl<'a> Checker<'a> {
    pub fn new(
        source: &'a dyn PageSource,
        store: &'a dyn StateStore,
        calculator: FingerprintCalculator,
    ) -> Self {
        Self {
            source,
            store,
            calculator,
            notifier: None,
        }
    }

    /// Attach the notifier used on `Changed`. `None` disables notification.
    pub fn with_notifier(mut self, notifier: Option<&'a dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Run one check cycle against `target`.
    pub async fn check(&self, target: &str) -> Result<CheckReport> {
        log::step(1, TOTAL_STEPS, "Validate target");
        let url = parse_target(target)?;

        log::step(2, TOTAL_STEPS, &format!("Fetch {url}"));
        let content = self.source.fetch(&url).await?;

        log::step(3, TOTAL_STEPS, "Fingerprint and compare");
        let current = self.calculator.calculate(&content);
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        log::sub_item(&format!(
            "Current {}: {}",
            self.calculator.algorithm().as_str(),
            current
        ));

        log::sub_item(&format!("Checksum file path: {}", self.store.location()));
        let previous = self.store.read().await?;
        if let Some(prev) = &previous {
            if !prev.matches_algorithm(self.calculator.algorithm()) {
                log::warn(&format!(
                    "Stored checksum '{}' does not look like a {} digest; was the algorithm changed?",
                    prev,
                    self.calculator.algorithm().as_str()
                ));
            }
        }

        let outcome = classify(previous.as_ref(), &current);
        log::step(4, TOTAL_STEPS, &format!("Outcome: {outcome}"));

        let mut report = CheckReport {
            url: url.to_string(),
            outcome,
            previous,
            current,
            state_written: None,
            notification: NotificationStatus::NotRequired,
            timestamp,
        };

        match outcome {
            CheckOutcome::Changed => self.handle_change(&mut report).await,
            CheckOutcome::FirstObservation => self.handle_first_check(&mut report).await,
            CheckOutcome::Unchanged => {
                log::info(&format!("Checksum unchanged: {}", report.current));
            }
        }

        Ok(report)
    }

    async fn handle_change(&self, report: &mut CheckReport) {
        log::info("Checksum changed!");
        if let Some(prev) = &report.previous {
            log::sub_item(&format!("Previous: {prev}"));
        }
        log::sub_item(&format!("Current:  {}", report.current));
        log::sub_item(&format!("Timestamp: {}", report.timestamp));

        report.state_written = Some(self.persist(&report.current).await);

        let Some(notifier) = self.notifier else {
            log::info("Notifier not configured. Skipping notification.");
            report.notification = NotificationStatus::Disabled;
            return;
        };

        let previous = report
            .previous
            .clone()
            .unwrap_or_else(|| Fingerprint::new(""));
        let payload = format_change(&report.url, &report.timestamp, &previous, &report.current);

        report.notification = if notifier.send(&payload.subject, &payload.body).await {
            NotificationStatus::Sent
        } else {
            log::warn(&format!(
                "Failed to send {} notification; change is still reported",
                notifier.channel()
            ));
            NotificationStatus::Failed
        };
    }

    async fn handle_first_check(&self, report: &mut CheckReport) {
        log::info(&format!("First check - storing checksum: {}", report.current));
        report.state_written = Some(self.persist(&report.current).await);
    }

    /// Write state, reporting failure loudly instead of propagating it.
    async fn persist(&self, fingerprint: &Fingerprint) -> bool {
        match self.store.write(fingerprint).await {
            Ok(()) => true,
            Err(e) => {
                log::error(&format!(
                    "{e}. The next run will report this change again."
                ));
                false
            }
        }
    }
}
