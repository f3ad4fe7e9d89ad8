//! Email delivery backends.

mod http_mailer;
mod log_mailer;

use std::sync::Arc;

use crate::config::EmailSettings;
use crate::domain::Mailer;

pub use http_mailer::HttpMailer;
pub use log_mailer::LogMailer;

/// Provider-backed mailer when an API key is configured, log-only otherwise.
pub fn create_mailer(settings: &EmailSettings) -> anyhow::Result<Arc<dyn Mailer>> {
    match settings.api_key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => Ok(Arc::new(HttpMailer::new(settings)?)),
        _ => {
            tracing::warn!("No email API key configured; outgoing emails will only be logged");
            Ok(Arc::new(LogMailer))
        }
    }
}
