//! Bounded mail queue drained by one background worker.

use super::{MailDispatcher, MailError, MailMessage, MailTransport};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Producer side of the mail queue. Cloning shares the same worker.
#[derive(Clone)]
pub struct MailQueue {
    tx: mpsc::Sender<MailMessage>,
}

impl MailQueue {
    /// Spawn the delivery worker. The worker exits once every `MailQueue`
    /// clone has been dropped and the backlog is drained.
    pub fn start(capacity: usize, transport: Arc<dyn MailTransport>) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<MailMessage>(capacity);

        let worker = tokio::spawn(async move {
            info!(capacity, "mail worker started");
            while let Some(message) = rx.recv().await {
                match transport.send(&message).await {
                    Ok(()) => debug!(to = %message.to, "mail delivered"),
                    Err(e) => warn!(to = %message.to, error = %e, "mail delivery failed"),
                }
            }
            info!("mail worker stopped");
        });

        (Self { tx }, worker)
    }
}

#[async_trait]
impl MailDispatcher for MailQueue {
    async fn enqueue(&self, message: MailMessage) -> Result<(), MailError> {
        // waits while the queue is full
        self.tx.send(message).await.map_err(|_| MailError::QueueClosed)
    }
}
