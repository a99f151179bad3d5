//! Log-only delivery, used when no SMTP relay is configured.

use async_trait::async_trait;

use super::email::EmailError;
use super::MailTransport;
use crate::mail::MailData;

/// Writes each message to the log instead of sending it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    async fn send(&self, mail: &MailData) -> Result<(), EmailError> {
        tracing::info!(
            to = %mail.to,
            from = %mail.from,
            subject = %mail.subject,
            template = mail.template.as_deref().unwrap_or("-"),
            "SMTP not configured, email logged only"
        );
        Ok(())
    }
}
