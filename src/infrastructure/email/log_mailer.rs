//! Mailer that only logs; used when no provider is configured.

use async_trait::async_trait;

use crate::domain::{EmailMessage, Mailer, MailerError};

pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> Result<String, MailerError> {
        let id = format!("logged-{}", uuid::Uuid::new_v4());
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            bytes = message.html.len(),
            id = %id,
            "Email not delivered (no provider configured)"
        );
        Ok(id)
    }
}
