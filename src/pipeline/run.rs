// src/pipeline/run.rs

//! Pipeline entry point wiring the concrete services together.

use chrono::Utc;

use crate::config::Settings;
use crate::error::Result;
use crate::models::CheckReport;
use crate::services::{HttpFetcher, Notifier};
use crate::storage::{FileStateStore, HeartbeatStore};
use crate::utils::log;

use super::check::Checker;
use super::fingerprint::FingerprintCalculator;
use super::heartbeat::run_heartbeat;

/// Run one full check cycle with HTTP fetching and file-backed state.
pub async fn run_check(settings: &Settings) -> Result<CheckReport> {
    log::header("pagewatch: checking for changes");

    let target = settings.target()?;
    let config = &settings.config;

    let fetcher = HttpFetcher::new(&config.fetcher)?;
    let store = FileStateStore::new(&config.state.checksum_file);
    let calculator = FingerprintCalculator::new(config.fingerprint.algorithm);

    let notifier: Option<Box<dyn Notifier>> = settings
        .notifier
        .clone()
        .map(|nc| nc.into_notifier(fetcher.client()));
    match &notifier {
        Some(n) => log::info(&format!("Notification channel: {}", n.channel())),
        None => log::info("No notification channel configured"),
    }

    let report = Checker::new(&fetcher, &store, calculator)
        .with_notifier(notifier.as_deref())
        .check(target)
        .await?;

    let heartbeat_store = HeartbeatStore::new(&config.state.heartbeat_file);
    if let Err(e) = run_heartbeat(
        &config.heartbeat,
        &heartbeat_store,
        &report,
        notifier.as_deref(),
        Utc::now(),
    )
    .await
    {
        log::warn(&format!("Heartbeat check failed, no ping sent: {e}"));
    }

    log::summary(
        "Check complete",
        &[
            ("URL", report.url.clone()),
            ("Outcome", report.outcome.to_string()),
            ("Checksum", report.current.to_string()),
            ("Notification", format!("{:?}", report.notification)),
            ("Exit code", report.exit_code().to_string()),
        ],
    );

    if report.state_write_failed() {
        log::error("State was not persisted; see errors above");
    } else {
        log::success("Done");
    }

    Ok(report)
}
