//! Authentication Handlers

use axum::{extract::State, Extension, Json};
use serde_json::Value;

use crate::application::dto::{LoginRequest, LoginResponse};
use crate::application::services::AuthService;
use crate::presentation::http::extractors::ValidJson;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Login with credentials
pub async fn login(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = body.email.unwrap_or_default();
    let password = body.password.unwrap_or_default();

    let response = state.auth().login(&email, &password).await?;
    Ok(Json(response))
}

/// Current user, from the bearer token
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.auth().current_user(&user.user_id).await?))
}
