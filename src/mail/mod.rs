//! Outbound mail: the dispatcher seam, a bounded delivery queue and transports.

mod queue;
mod transport;

pub use queue::MailQueue;
pub use transport::{LogTransport, SmtpTransport};

use async_trait::async_trait;
use thiserror::Error;

/// Plain-text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    /// The delivery worker is gone; nothing more can be queued.
    #[error("mail queue closed")]
    QueueClosed,

    #[error("invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Accepts messages for asynchronous delivery.
#[async_trait]
pub trait MailDispatcher: Send + Sync {
    /// Queue `message`. `Ok` means accepted, not delivered.
    async fn enqueue(&self, message: MailMessage) -> Result<(), MailError>;
}

/// Delivers one message synchronously with respect to the caller.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}
