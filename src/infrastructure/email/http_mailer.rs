//! Email provider HTTP API client.
//!
//! Posts `{from, to, subject, html}` with a bearer API key and reads the
//! message id from the `id` field of the JSON reply.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::EmailSettings;
use crate::domain::{EmailMessage, Mailer, MailerError};
use crate::infrastructure::metrics;

pub struct HttpMailer {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

#[derive(Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Deserialize)]
struct SendEmailReply {
    #[serde(default)]
    id: Option<String>,
}

impl HttpMailer {
    pub fn new(settings: &EmailSettings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            api_url: settings.api_url.clone(),
            api_key: settings.api_key.clone().unwrap_or_default(),
            from: settings.from.clone(),
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<String, MailerError> {
        let body = SendEmailBody {
            from: &self.from,
            to: [message.to.as_str()],
            subject: &message.subject,
            html: &message.html,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                metrics::record_email(false);
                MailerError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            metrics::record_email(false);
            let body = response.text().await.unwrap_or_default();
            return Err(MailerError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        metrics::record_email(true);
        let reply: SendEmailReply = response.json().await.unwrap_or(SendEmailReply { id: None });
        let id = reply.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        tracing::info!(to = %message.to, subject = %message.subject, id = %id, "Email sent");
        Ok(id)
    }
}
