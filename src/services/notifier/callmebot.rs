//! WhatsApp notifications through the CallMeBot HTTP API.
//!
//! The API takes phone, text and key as query parameters on a GET.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;

use crate::config::{EnvLookup, env_value};
use crate::error::{AppError, Result};
use crate::models::NotificationPayload;

use super::Notifier;

pub const CHANNEL: &str = "callmebot";

pub const DEFAULT_ENDPOINT: &str = "https://api.callmebot.com/whatsapp.php";

/// International number, optional leading '+'.
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{6,15}$").expect("valid phone regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallMeBotConfig {
    pub phone: String,
    pub api_key: String,
    pub endpoint: String,
}

impl CallMeBotConfig {
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Self {
        Self {
            phone: env_value(lookup, "CALLMEBOT_PHONE").unwrap_or_default(),
            api_key: env_value(lookup, "CALLMEBOT_API_KEY").unwrap_or_default(),
            endpoint: env_value(lookup, "CALLMEBOT_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        }
    }

    fn validate(&self) -> Result<String> {
        if self.phone.is_empty() || self.api_key.is_empty() {
            return Err(AppError::notification(
                CHANNEL,
                "WhatsApp phone number or API key not provided",
            ));
        }
        let phone: String = self.phone.chars().filter(|c| !c.is_whitespace()).collect();
        if !PHONE_PATTERN.is_match(&phone) {
            return Err(AppError::notification(
                CHANNEL,
                format!("invalid phone number '{}'", self.phone),
            ));
        }
        Ok(phone)
    }
}

pub struct CallMeBotNotifier {
    config: CallMeBotConfig,
    client: Client,
}

impl CallMeBotNotifier {
    pub fn new(config: CallMeBotConfig, client: Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl Notifier for CallMeBotNotifier {
    fn channel(&self) -> &'static str {
        CHANNEL
    }

    async fn deliver(&self, payload: &NotificationPayload) -> Result<()> {
        let phone = self.config.validate()?;

        // WhatsApp has no subject line; the body already leads with a title.
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("phone", phone.as_str()),
                ("text", payload.body.as_str()),
                ("apikey", self.config.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::notification(CHANNEL, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::notification(
                CHANNEL,
                format!("API responded with HTTP {status}"),
            ));
        }
        Ok(())
    }
}
