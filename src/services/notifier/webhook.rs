//! Generic JSON webhook notifications.
//!
//! POSTs `{"subject": ..., "message": ...}` to the configured endpoint,
//! with an optional bearer token.

use async_trait::async_trait;
use reqwest::Client;

use crate::config::{EnvLookup, env_value};
use crate::error::{AppError, Result};
use crate::models::NotificationPayload;
use crate::utils::parse_target;

use super::Notifier;

pub const CHANNEL: &str = "webhook";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    pub url: String,
    pub token: Option<String>,
}

impl WebhookConfig {
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Self {
        Self {
            url: env_value(lookup, "WEBHOOK_URL").unwrap_or_default(),
            token: env_value(lookup, "WEBHOOK_TOKEN"),
        }
    }
}

pub struct WebhookNotifier {
    config: WebhookConfig,
    client: Client,
}

impl WebhookNotifier {
    pub fn new(config: WebhookConfig, client: Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn channel(&self) -> &'static str {
        CHANNEL
    }

    async fn deliver(&self, payload: &NotificationPayload) -> Result<()> {
        if self.config.url.is_empty() {
            return Err(AppError::notification(CHANNEL, "WEBHOOK_URL not provided"));
        }
        let endpoint = parse_target(&self.config.url)
            .map_err(|e| AppError::notification(CHANNEL, e))?;

        let mut request = self.client.post(endpoint).json(payload);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::notification(CHANNEL, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::notification(
                CHANNEL,
                format!("endpoint responded with HTTP {status}"),
            ));
        }
        Ok(())
    }
}
