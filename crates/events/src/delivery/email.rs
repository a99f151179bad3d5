//! Email delivery via SMTP.
//!
//! [`EmailDelivery`] wraps the `lettre` async SMTP transport. Configuration is
//! loaded from environment variables; if `SMTP_HOST` is not set,
//! [`EmailConfig::from_env`] returns `None` and no mailer should be
//! constructed.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::MailTransport;
use crate::mail::MailData;

/// Placeholder replaced by the message content in HTML templates.
pub const BODY_PLACEHOLDER: &str = "[%body%]";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// The named template could not be read.
    #[error("Email template '{name}' unavailable: {source}")]
    Template {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// Produce the final HTML body for `mail`.
///
/// Without a template the content is used as-is. With one, the file
/// `<templates_dir>/<name>` is read and its first `[%body%]` replaced.
pub async fn render_body(templates_dir: &Path, mail: &MailData) -> Result<String, EmailError> {
    let Some(name) = &mail.template else {
        return Ok(mail.content.clone());
    };
    let template = tokio::fs::read_to_string(templates_dir.join(name))
        .await
        .map_err(|source| EmailError::Template {
            name: name.clone(),
            source,
        })?;
    Ok(template.replacen(BODY_PLACEHOLDER, &mail.content, 1))
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (a local catch-all relay such as MailHog).
const DEFAULT_SMTP_PORT: u16 = 1025;

/// Configuration for the SMTP email delivery service.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 1025).
    pub smtp_port: u16,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
    /// Upgrade the connection with STARTTLS. Off for local relays.
    pub starttls: bool,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and messages should only be logged.
    ///
    /// | Variable        | Required | Default |
    /// |-----------------|----------|---------|
    /// | `SMTP_HOST`     | yes      | -       |
    /// | `SMTP_PORT`     | no       | `1025`  |
    /// | `SMTP_USER`     | no       | -       |
    /// | `SMTP_PASSWORD` | no       | -       |
    /// | `SMTP_STARTTLS` | no       | `false` |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
            starttls: std::env::var("SMTP_STARTTLS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        })
    }
}

// ---------------------------------------------------------------------------
// EmailDelivery
// ---------------------------------------------------------------------------

/// Sends notification emails via SMTP, wrapping bodies in HTML templates.
pub struct EmailDelivery {
    config: EmailConfig,
    templates_dir: PathBuf,
}

impl EmailDelivery {
    /// Create a new email delivery service with the given configuration.
    pub fn new(config: EmailConfig, templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            templates_dir: templates_dir.into(),
        }
    }

    fn mailer(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let builder = if self.config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.smtp_host)
        };
        let mut transport_builder = builder.port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(transport_builder.build())
    }
}

#[async_trait]
impl MailTransport for EmailDelivery {
    async fn send(&self, mail: &MailData) -> Result<(), EmailError> {
        let body = render_body(&self.templates_dir, mail).await?;

        let email = Message::builder()
            .from(mail.from.parse()?)
            .to(mail.to.parse()?)
            .subject(mail.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(body)
            .map_err(|e| EmailError::Build(e.to_string()))?;

        self.mailer()?.send(email).await?;

        tracing::info!(to = %mail.to, subject = %mail.subject, "Notification email sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
