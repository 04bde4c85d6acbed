//! Notification message formatting.

use crate::models::{Fingerprint, NotificationPayload};

/// Timestamp layout used in messages and logs.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render the notification for a detected change.
pub fn format_change(
    url: &str,
    timestamp: &str,
    previous: &Fingerprint,
    current: &Fingerprint,
) -> NotificationPayload {
    let subject = format!("Webpage Checksum Changed - {url}");
    let body = format!(
        "Webpage Checksum Changed!\n\n\
         URL: {url}\n\
         Date: {timestamp}\n\
         Previous Checksum: {previous}\n\
         Current Checksum: {current}\n"
    );
    NotificationPayload::new(subject, body)
}

/// Render the periodic liveness ping sent while nothing changes.
pub fn format_heartbeat(url: &str, timestamp: &str, current: &Fingerprint) -> NotificationPayload {
    let subject = format!("Webpage Monitor Heartbeat - {url}");
    let body = format!(
        "Checksum unchanged; the monitor is still running.\n\n\
         URL: {url}\n\
         Date: {timestamp}\n\
         Current Checksum: {current}\n"
    );
    NotificationPayload::new(subject, body)
}
