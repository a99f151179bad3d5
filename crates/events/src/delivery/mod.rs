//! Delivery channels for outgoing mail.

use async_trait::async_trait;

use crate::mail::MailData;

pub mod email;
pub mod log;
pub mod memory;

use email::EmailError;

/// Hands one message to the outside world.
///
/// Implementations must not retry: delivery is at-most-once.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &MailData) -> Result<(), EmailError>;
}
