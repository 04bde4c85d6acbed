// src/models/notification.rs

use serde::Serialize;

/// Rendered notification ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationPayload {
    pub subject: String,
    #[serde(rename = "message")]
    pub body: String,
}

impl NotificationPayload {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }
}
