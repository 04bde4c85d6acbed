//! Outbound notification channels.
//!
//! Every channel implements [`Notifier`]. Configuration is a tagged
//! [`NotifierConfig`] with one struct per channel, assembled once from the
//! environment. No configured channel means notifications are disabled.
//!
//! ```text
//! NOTIFIER=email      EMAIL_TO, EMAIL_FROM, EMAIL_REPLY_TO,
//!                     SMTP_HOST, SMTP_PORT, SMTP_USERNAME, SMTP_PASSWORD, SMTP_ENCRYPTION
//! NOTIFIER=webhook    WEBHOOK_URL, WEBHOOK_TOKEN
//! NOTIFIER=callmebot  CALLMEBOT_PHONE, CALLMEBOT_API_KEY
//! ```

pub mod callmebot;
pub mod email;
pub mod webhook;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::{EnvLookup, env_value};
use crate::error::Result;
use crate::models::NotificationPayload;

pub use callmebot::{CallMeBotConfig, CallMeBotNotifier};
pub use email::{EmailConfig, EmailNotifier, SmtpConfig, SmtpEncryption};
pub use webhook::{WebhookConfig, WebhookNotifier};

/// A channel able to deliver one message per call.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short channel name for logs.
    fn channel(&self) -> &'static str;

    /// Validate configuration, then make a single delivery attempt.
    async fn deliver(&self, payload: &NotificationPayload) -> Result<()>;

    /// Deliver and report success as a flag. Never fails the caller.
    async fn send(&self, subject: &str, message: &str) -> bool {
        let payload = NotificationPayload::new(subject, message);
        match self.deliver(&payload).await {
            Ok(()) => {
                log::info!("{} notification sent successfully", self.channel());
                true
            }
            Err(e) => {
                log::error!("{}", e);
                false
            }
        }
    }
}

/// Channel selection plus its settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierConfig {
    Email(EmailConfig),
    Webhook(WebhookConfig),
    CallMeBot(CallMeBotConfig),
}

impl NotifierConfig {
    /// Assemble the notifier configuration from environment values.
    ///
    /// `NOTIFIER` picks a channel explicitly. Otherwise the first channel
    /// whose primary variable is set wins, in the order email, webhook,
    /// callmebot. Returns `None` when nothing is configured.
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Option<Self> {
        if let Some(choice) = env_value(lookup, "NOTIFIER") {
            match choice.to_lowercase().as_str() {
                "email" | "smtp" | "mail" => {
                    return Some(Self::Email(EmailConfig::from_lookup(lookup)));
                }
                "webhook" => return Some(Self::Webhook(WebhookConfig::from_lookup(lookup))),
                "callmebot" | "whatsapp" => {
                    return Some(Self::CallMeBot(CallMeBotConfig::from_lookup(lookup)));
                }
                "none" | "off" => return None,
                other => log::warn!(
                    "Unknown NOTIFIER '{}'; falling back to auto-detection",
                    other
                ),
            }
        }

        if env_value(lookup, "EMAIL_TO").is_some() {
            Some(Self::Email(EmailConfig::from_lookup(lookup)))
        } else if env_value(lookup, "WEBHOOK_URL").is_some() {
            Some(Self::Webhook(WebhookConfig::from_lookup(lookup)))
        } else if env_value(lookup, "CALLMEBOT_PHONE").is_some()
            || env_value(lookup, "CALLMEBOT_API_KEY").is_some()
        {
            Some(Self::CallMeBot(CallMeBotConfig::from_lookup(lookup)))
        } else {
            None
        }
    }

    pub fn channel(&self) -> &'static str {
        match self {
            Self::Email(_) => email::CHANNEL,
            Self::Webhook(_) => webhook::CHANNEL,
            Self::CallMeBot(_) => callmebot::CHANNEL,
        }
    }

    /// Build the notifier. HTTP channels share the given client.
    pub fn into_notifier(self, client: &Client) -> Box<dyn Notifier> {
        match self {
            Self::Email(config) => Box::new(EmailNotifier::new(config)),
            Self::Webhook(config) => Box::new(WebhookNotifier::new(config, client.clone())),
            Self::CallMeBot(config) => Box::new(CallMeBotNotifier::new(config, client.clone())),
        }
    }
}
