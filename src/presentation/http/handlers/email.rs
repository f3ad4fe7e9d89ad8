//! Email Handler

use axum::{extract::State, Json};

use crate::application::dto::{EmailRequest, EmailSentResponse};
use crate::domain::EmailMessage;
use crate::presentation::http::extractors::ValidJson;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Send an email through the configured provider
pub async fn send_email(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<EmailRequest>,
) -> Result<Json<EmailSentResponse>, AppError> {
    let message = EmailMessage {
        to: body.to.unwrap_or_default(),
        subject: body.subject.unwrap_or_default(),
        html: body.html.unwrap_or_default(),
    };

    let id = state
        .mailer
        .send(&message)
        .await
        .map_err(|e| AppError::Internal(format!("Email delivery failed: {}", e)))?;

    Ok(Json(EmailSentResponse {
        message: "Email sent",
        id,
    }))
}
