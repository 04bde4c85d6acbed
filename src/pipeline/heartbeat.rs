//! Optional liveness ping.
//!
//! While a page stays unchanged the operator hears nothing, which looks the
//! same as a broken monitor. When an interval is configured, an `Unchanged`
//! run sends a short "still alive" message at most once per interval.

use chrono::{DateTime, Duration, Utc};

use crate::error::Result;
use crate::models::{CheckOutcome, CheckReport, HeartbeatConfig};
use crate::services::Notifier;
use crate::services::formatter::format_heartbeat;
use crate::storage::HeartbeatStore;

/// Due when never sent, or when at least `interval` has passed.
pub fn heartbeat_due(last: Option<DateTime<Utc>>, now: DateTime<Utc>, interval: Duration) -> bool {
    match last {
        None => true,
        Some(last) => now.signed_duration_since(last) >= interval,
    }
}

/// Send a heartbeat if one is due. Returns whether one was delivered.
///
/// The timestamp is recorded only after a confirmed send, so a failed ping
/// is retried on the next unchanged run.
pub async fn run_heartbeat(
    config: &HeartbeatConfig,
    store: &HeartbeatStore,
    report: &CheckReport,
    notifier: Option<&dyn Notifier>,
    now: DateTime<Utc>,
) -> Result<bool> {
    if report.outcome != CheckOutcome::Unchanged {
        return Ok(false);
    }
    let Some(days) = config.interval_days else {
        return Ok(false);
    };
    let Some(notifier) = notifier else {
        log::debug!("Heartbeat enabled but no notifier configured");
        return Ok(false);
    };

    let last = store.last_sent().await?;
    if !heartbeat_due(last, now, Duration::days(i64::from(days))) {
        log::debug!("Heartbeat not due (last sent {:?})", last);
        return Ok(false);
    }

    let payload = format_heartbeat(&report.url, &report.timestamp, &report.current);
    if !notifier.send(&payload.subject, &payload.body).await {
        log::warn!("Heartbeat notification failed; will retry on the next run");
        return Ok(false);
    }

    if let Err(e) = store.record(now).await {
        log::error!(
            "Heartbeat sent but its timestamp was not recorded ({}); the next unchanged run will send again",
            e
        );
        return Ok(true);
    }
    log::info!("Heartbeat sent; next one due in {} day(s)", days);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::TimeZone;
    use tempfile::TempDir;

    use crate::error::AppError;
    use crate::models::{Fingerprint, NotificationPayload, NotificationStatus};

    struct CountingNotifier {
        calls: AtomicUsize,
        accept: bool,
    }

    impl CountingNotifier {
        fn new(accept: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                accept,
            }
        }
    }

    #[async_trait]
    impl Notifier for CountingNotifier {
        fn channel(&self) -> &'static str {
            "counting"
        }

        async fn deliver(&self, _payload: &NotificationPayload) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.accept {
                Ok(())
            } else {
                Err(AppError::notification("counting", "down"))
            }
        }
    }

    fn report(outcome: CheckOutcome) -> CheckReport {
        CheckReport {
            url: "https://example.com/".into(),
            outcome,
            previous: Some(Fingerprint::new("aa")),
            current: Fingerprint::new("aa"),
            state_written: None,
            notification: NotificationStatus::NotRequired,
            timestamp: "2026-01-12 08:00:00".into(),
        }
    }

    fn weekly() -> HeartbeatConfig {
        HeartbeatConfig {
            interval_days: Some(7),
        }
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, day, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_heartbeat_due() {
        let week = Duration::days(7);
        assert!(heartbeat_due(None, at(10), week));
        assert!(!heartbeat_due(Some(at(5)), at(11), week));
        assert!(heartbeat_due(Some(at(5)), at(12), week));
    }

    #[tokio::test]
    async fn test_sends_and_records_when_due() {
        let tmp = TempDir::new().unwrap();
        let store = HeartbeatStore::new(tmp.path().join(".heartbeat"));
        let notifier = CountingNotifier::new(true);

        let sent = run_heartbeat(
            &weekly(),
            &store,
            &report(CheckOutcome::Unchanged),
            Some(&notifier),
            at(12),
        )
        .await
        .unwrap();

        assert!(sent);
        assert_eq!(store.last_sent().await.unwrap(), Some(at(12)));

        // Second run the next day is not due.
        let sent = run_heartbeat(
            &weekly(),
            &store,
            &report(CheckOutcome::Unchanged),
            Some(&notifier),
            at(13),
        )
        .await
        .unwrap();
        assert!(!sent);
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_skipped_unless_unchanged() {
        let tmp = TempDir::new().unwrap();
        let store = HeartbeatStore::new(tmp.path().join(".heartbeat"));
        let notifier = CountingNotifier::new(true);

        for outcome in [CheckOutcome::Changed, CheckOutcome::FirstObservation] {
            let sent = run_heartbeat(&weekly(), &store, &report(outcome), Some(&notifier), at(12))
                .await
                .unwrap();
            assert!(!sent);
        }
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_disabled_without_interval() {
        let tmp = TempDir::new().unwrap();
        let store = HeartbeatStore::new(tmp.path().join(".heartbeat"));
        let notifier = CountingNotifier::new(true);

        let sent = run_heartbeat(
            &HeartbeatConfig::default(),
            &store,
            &report(CheckOutcome::Unchanged),
            Some(&notifier),
            at(12),
        )
        .await
        .unwrap();
        assert!(!sent);
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_failed_ping_not_recorded() {
        let tmp = TempDir::new().unwrap();
        let store = HeartbeatStore::new(tmp.path().join(".heartbeat"));
        let notifier = CountingNotifier::new(false);

        let sent = run_heartbeat(
            &weekly(),
            &store,
            &report(CheckOutcome::Unchanged),
            Some(&notifier),
            at(12),
        )
        .await
        .unwrap();
        assert!(!sent);
        assert!(store.last_sent().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unrecorded_ping_still_counts_as_sent() {
        let tmp = TempDir::new().unwrap();
        // Parent is a regular file: nothing to read, nothing can be written.
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let store = HeartbeatStore::new(blocker.join(".heartbeat"));
        let notifier = CountingNotifier::new(true);

        let sent = run_heartbeat(
            &weekly(),
            &store,
            &report(CheckOutcome::Unchanged),
            Some(&notifier),
            at(12),
        )
        .await
        .unwrap();

        assert!(sent);
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
        assert!(store.last_sent().await.unwrap().is_none());
    }
}
