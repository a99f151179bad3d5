//! Bounded mail queue with a single background worker.
//!
//! [`MailDispatcher`] handles are cheap to clone and never wait: a full queue
//! is reported to the caller instead. The worker ([`MailQueue::run`]) delivers
//! messages one at a time and logs failures; nothing is retried.
//!
//! Shutdown: once every dispatcher handle is dropped the worker drains what is
//! already queued and returns. Callers that cannot wait indefinitely bound the
//! drain with a timeout and abort the task, discarding the remainder.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::delivery::MailTransport;
use crate::mail::MailData;

/// Why a message could not be enqueued.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Mail queue is full")]
    QueueFull(MailData),

    #[error("Mail queue is closed")]
    Closed(MailData),
}

/// Enqueue side of the mail pipeline.
#[derive(Debug, Clone)]
pub struct MailDispatcher {
    sender: mpsc::Sender<MailData>,
}

/// Consume side of the mail pipeline, owned by the worker.
#[derive(Debug)]
pub struct MailQueue {
    receiver: mpsc::Receiver<MailData>,
}

impl MailDispatcher {
    /// Create a dispatcher and its queue. A capacity of 0 is raised to 1.
    pub fn channel(capacity: usize) -> (Self, MailQueue) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, MailQueue { receiver })
    }

    /// Create a dispatcher and spawn its worker on the current runtime.
    ///
    /// The handle resolves to the number of messages delivered.
    pub fn spawn(
        capacity: usize,
        transport: Arc<dyn MailTransport>,
    ) -> (Self, JoinHandle<usize>) {
        let (dispatcher, queue) = Self::channel(capacity);
        let handle = tokio::spawn(queue.run(transport));
        (dispatcher, handle)
    }

    /// Hand a message to the worker without waiting for delivery.
    pub fn send(&self, mail: MailData) -> Result<(), DispatchError> {
        self.sender.try_send(mail).map_err(|e| match e {
            mpsc::error::TrySendError::Full(mail) => DispatchError::QueueFull(mail),
            mpsc::error::TrySendError::Closed(mail) => DispatchError::Closed(mail),
        })
    }
}

impl MailQueue {
    /// Deliver messages until every dispatcher handle is dropped and the
    /// queue is empty. Returns the number delivered successfully.
    pub async fn run(mut self, transport: Arc<dyn MailTransport>) -> usize {
        tracing::info!("Mail worker started");
        let mut delivered = 0;
        while let Some(mail) = self.receiver.recv().await {
            match transport.send(&mail).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        to = %mail.to,
                        subject = %mail.subject,
                        "Failed to deliver email"
                    );
                }
            }
        }
        tracing::info!(delivered, "Mail queue closed, worker shutting down");
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::memory::MemoryTransport;

    fn mail(subject: &str) -> MailData {
        MailData::new("guest@example.com", "bookings@example.com", subject, "<p>hi</p>")
    }

    #[tokio::test]
    async fn worker_drains_queue_after_last_handle_drops() {
        let transport = MemoryTransport::new();
        let (dispatcher, handle) = MailDispatcher::spawn(10, Arc::new(transport.clone()));

        dispatcher.send(mail("one")).unwrap();
        dispatcher.clone().send(mail("two")).unwrap();
        drop(dispatcher);

        assert_eq!(handle.await.unwrap(), 2);
        let subjects: Vec<_> = transport.sent().into_iter().map(|m| m.subject).collect();
        assert_eq!(subjects, vec!["one", "two"]);
    }

    #[test]
    fn full_queue_is_reported_not_awaited() {
        let (dispatcher, _queue) = MailDispatcher::channel(1);
        dispatcher.send(mail("first")).unwrap();
        let err = dispatcher.send(mail("second")).unwrap_err();
        assert!(matches!(err, DispatchError::QueueFull(m) if m.subject == "second"));
    }

    #[test]
    fn closed_queue_is_reported() {
        let (dispatcher, queue) = MailDispatcher::channel(4);
        drop(queue);
        assert!(matches!(dispatcher.send(mail("late")), Err(DispatchError::Closed(_))));
    }

    #[tokio::test]
    async fn delivery_failures_do_not_stop_the_worker() {
        let transport = MemoryTransport::new();
        transport.set_failing(true);
        let (dispatcher, queue) = MailDispatcher::channel(4);
        dispatcher.send(mail("lost")).unwrap();
        drop(dispatcher);

        assert_eq!(queue.run(Arc::new(transport.clone())).await, 0);
        assert!(transport.sent().is_empty());
    }
}
