//! Outgoing email port.

use async_trait::async_trait;
use serde::Serialize;

/// A rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Email delivery errors
#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("email provider unreachable: {0}")]
    Transport(String),

    #[error("email provider rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Delivers email through an external provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a message, returning the provider's message id.
    async fn send(&self, message: &EmailMessage) -> Result<String, MailerError>;
}
