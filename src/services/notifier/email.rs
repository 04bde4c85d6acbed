//! E-mail notifications.
//!
//! Uses SMTP when `SMTP_HOST` is set, otherwise hands the message to the
//! local `sendmail` binary. SMTP authentication is used when both username
//! and password are present.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSendmailTransport, AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

use crate::config::{EnvLookup, env_value};
use crate::error::{AppError, Result};
use crate::models::NotificationPayload;

use super::Notifier;

pub const CHANNEL: &str = "email";

/// SMTP connection security.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmtpEncryption {
    /// Plain connection upgraded with STARTTLS (`tls`)
    #[default]
    StartTls,
    /// TLS from the first byte (`ssl`)
    Ssl,
}

impl SmtpEncryption {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "tls" | "starttls" => Some(Self::StartTls),
            "ssl" | "smtps" => Some(Self::Ssl),
            _ => None,
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Self::StartTls => 587,
            Self::Ssl => 465,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub encryption: SmtpEncryption,
}

impl SmtpConfig {
    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.encryption.default_port())
    }

    /// Credentials must come as a pair.
    fn credentials(&self) -> Result<Option<Credentials>> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Ok(Some(Credentials::new(user.clone(), pass.clone()))),
            (None, None) => Ok(None),
            (Some(_), None) => Err(AppError::notification(
                CHANNEL,
                "SMTP_USERNAME is set but SMTP_PASSWORD is missing",
            )),
            (None, Some(_)) => Err(AppError::notification(
                CHANNEL,
                "SMTP_PASSWORD is set but SMTP_USERNAME is missing",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfig {
    pub recipient: String,
    /// Defaults to the recipient when unset
    pub from: Option<String>,
    pub reply_to: Option<String>,
    /// `None` means local sendmail submission
    pub smtp: Option<SmtpConfig>,
}

impl EmailConfig {
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Self {
        let smtp = env_value(lookup, "SMTP_HOST").map(|host| {
            let port = env_value(lookup, "SMTP_PORT").and_then(|raw| match raw.parse::<u16>() {
                Ok(port) => Some(port),
                Err(_) => {
                    log::warn!("Ignoring invalid SMTP_PORT '{}'", raw);
                    None
                }
            });
            let encryption = env_value(lookup, "SMTP_ENCRYPTION")
                .map(|raw| {
                    SmtpEncryption::parse(&raw).unwrap_or_else(|| {
                        log::warn!("Unknown SMTP_ENCRYPTION '{}'; using tls", raw);
                        SmtpEncryption::StartTls
                    })
                })
                .unwrap_or_default();

            SmtpConfig {
                host,
                port,
                username: env_value(lookup, "SMTP_USERNAME"),
                password: env_value(lookup, "SMTP_PASSWORD"),
                encryption,
            }
        });

        Self {
            recipient: env_value(lookup, "EMAIL_TO").unwrap_or_default(),
            from: env_value(lookup, "EMAIL_FROM"),
            reply_to: env_value(lookup, "EMAIL_REPLY_TO"),
            smtp,
        }
    }
}

pub struct EmailNotifier {
    config: EmailConfig,
}

impl EmailNotifier {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Validate addresses and build the message.
    fn build_message(&self, payload: &NotificationPayload) -> Result<Message> {
        let to = parse_mailbox("recipient", &self.config.recipient)?;
        let from = match &self.config.from {
            Some(from) => parse_mailbox("sender", from)?,
            None => to.clone(),
        };

        let mut builder = Message::builder()
            .from(from)
            .to(to)
            .subject(payload.subject.as_str())
            .header(ContentType::TEXT_PLAIN);

        if let Some(reply_to) = &self.config.reply_to {
            builder = builder.reply_to(parse_mailbox("reply-to", reply_to)?);
        }

        builder
            .body(payload.body.clone())
            .map_err(|e| AppError::notification(CHANNEL, e))
    }

    fn smtp_transport(smtp: &SmtpConfig) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let builder = match smtp.encryption {
            SmtpEncryption::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
            }
            SmtpEncryption::Ssl => AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host),
        }
        .map_err(|e| AppError::notification(CHANNEL, e))?;

        let mut builder = builder.port(smtp.port());
        if let Some(credentials) = smtp.credentials()? {
            builder = builder.credentials(credentials);
        }
        Ok(builder.build())
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn channel(&self) -> &'static str {
        CHANNEL
    }

    async fn deliver(&self, payload: &NotificationPayload) -> Result<()> {
        let message = self.build_message(payload)?;

        log::info!("Attempting to send email to {}", self.config.recipient);
        log::debug!("Subject: {}", payload.subject);

        match &self.config.smtp {
            Some(smtp) => {
                // Fail on incomplete credentials before touching the network.
                let transport = Self::smtp_transport(smtp)?;
                log::info!("Using SMTP: {}:{}", smtp.host, smtp.port());
                let response = transport
                    .send(message)
                    .await
                    .map_err(|e| AppError::notification(CHANNEL, e))?;
                if !response.is_positive() {
                    return Err(AppError::notification(
                        CHANNEL,
                        format!("SMTP server replied {}", response.code()),
                    ));
                }
            }
            None => {
                log::info!("Using local sendmail (SMTP not configured)");
                AsyncSendmailTransport::<Tokio1Executor>::new()
                    .send(message)
                    .await
                    .map_err(|e| AppError::notification(CHANNEL, e))?;
            }
        }

        Ok(())
    }
}

fn parse_mailbox(role: &str, raw: &str) -> Result<Mailbox> {
    if raw.trim().is_empty() {
        return Err(AppError::notification(
            CHANNEL,
            format!("email {role} address not provided"),
        ));
    }
    raw.trim().parse::<Mailbox>().map_err(|e| {
        AppError::notification(CHANNEL, format!("invalid {role} address '{raw}': {e}"))
    })
}
