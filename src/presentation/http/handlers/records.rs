//! Record Handlers
//!
//! Pass-through CRUD shared by every plain collection. Each route
//! instantiates these with its entity type, e.g. `get(records::list::<Client>)`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use super::upserted;
use crate::domain::entities::Document;
use crate::presentation::http::extractors::ValidJson;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// List records; query parameters are equality filters
pub async fn list<T: Document>(
    State(state): State<AppState>,
    Query(filters): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Value>>, AppError> {
    Ok(Json(state.records().list(T::COLLECTION, &filters).await?))
}

/// Get a record by id
pub async fn get<T: Document>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.records().get(T::COLLECTION, &id).await?))
}

/// Create a record
pub async fn create<T: Document>(
    State(state): State<AppState>,
    ValidJson(record): ValidJson<T>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let created = state.records().create(record).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace a record, creating it under the path id when missing
pub async fn update<T: Document>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(record): ValidJson<T>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    Ok(upserted(state.records().upsert(&id, record).await?))
}

/// Delete a record
pub async fn delete<T: Document>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.records().delete(T::COLLECTION, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
