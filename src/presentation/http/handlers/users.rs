//! User Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use super::upserted;
use crate::domain::User;
use crate::presentation::http::extractors::ValidJson;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// List users (without passwords)
pub async fn list_users(
    State(state): State<AppState>,
    Query(filters): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Value>>, AppError> {
    Ok(Json(state.users().list(&filters).await?))
}

/// Get a user by id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.users().get(&id).await?))
}

/// Create a user
pub async fn create_user(
    State(state): State<AppState>,
    ValidJson(user): ValidJson<User>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let created = state.users().create(user).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update (or create) a user; default accounts keep their credentials
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(user): ValidJson<User>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    Ok(upserted(state.users().upsert(&id, user).await?))
}

/// Delete a user; default accounts are refused
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.users().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
