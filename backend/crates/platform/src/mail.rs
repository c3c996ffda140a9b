//! Outgoing Mail
//!
//! Verification and password reset codes are delivered by email. Production
//! posts the message as JSON to an HTTP mail relay; development just logs it.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail relay request failed: {0}")]
    Transport(String),

    #[error("Mail relay rejected the message with status {0}")]
    Rejected(u16),
}

/// Something that can deliver a [`MailMessage`].
#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    /// HTTP relay endpoint; `None` selects the logging mailer
    pub relay_url: Option<String>,
    pub api_key: Option<String>,
    pub from: String,
    pub timeout: Duration,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            relay_url: None,
            api_key: None,
            from: "Karma <no-reply@karma.local>".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

// ============================================================================
// HTTP relay
// ============================================================================

#[derive(Serialize)]
struct RelayPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

#[derive(Debug, Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    relay_url: String,
    api_key: Option<String>,
    from: String,
}

impl HttpMailer {
    pub fn new(relay_url: impl Into<String>, config: &MailConfig) -> Result<Self, MailError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MailError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            relay_url: relay_url.into(),
            api_key: config.api_key.clone(),
            from: config.from.clone(),
        })
    }
}

impl Mailer for HttpMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let payload = RelayPayload {
            from: &self.from,
            to: &message.to,
            subject: &message.subject,
            text: &message.text,
        };

        let mut request = self.client.post(&self.relay_url).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MailError::Rejected(response.status().as_u16()));
        }

        tracing::info!(to = %message.to, subject = %message.subject, "Mail sent");
        Ok(())
    }
}

// ============================================================================
// Development mailer
// ============================================================================

/// Writes messages to the log instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            text = %message.text,
            "Mail delivery skipped (log mailer)"
        );
        Ok(())
    }
}

// ============================================================================
// Runtime selection
// ============================================================================

/// Mailer chosen from configuration at startup.
#[derive(Debug, Clone)]
pub enum AnyMailer {
    Http(HttpMailer),
    Log(LogMailer),
}

impl AnyMailer {
    pub fn from_config(config: &MailConfig) -> Result<Self, MailError> {
        match &config.relay_url {
            Some(url) => Ok(Self::Http(HttpMailer::new(url.clone(), config)?)),
            None => Ok(Self::Log(LogMailer)),
        }
    }
}

impl Mailer for AnyMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        match self {
            Self::Http(mailer) => Mailer::send(mailer, message).await,
            Self::Log(mailer) => Mailer::send(mailer, message).await,
        }
    }
}
