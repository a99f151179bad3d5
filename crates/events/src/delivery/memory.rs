//! In-memory delivery that records messages for inspection in tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::email::EmailError;
use super::MailTransport;
use crate::mail::MailData;

/// Collects every delivered message. Clones share the same mailbox.
#[derive(Debug, Default, Clone)]
pub struct MemoryTransport {
    sent: Arc<Mutex<Vec<MailData>>>,
    failing: Arc<AtomicBool>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of the messages delivered so far, oldest first.
    pub fn sent(&self) -> Vec<MailData> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl MailTransport for MemoryTransport {
    async fn send(&self, mail: &MailData) -> Result<(), EmailError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EmailError::Build("memory transport set to fail".to_string()));
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(mail.clone());
        }
        Ok(())
    }
}
