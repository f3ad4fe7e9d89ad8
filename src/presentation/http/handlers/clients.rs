//! Client Handlers
//!
//! Nested listings under a client. Plain client CRUD goes through `records`.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::domain::Collection;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Vehicles owned by a client
pub async fn vehicles(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Value>>, AppError> {
    owned_by(&state, &id, Collection::Vehicles).await
}

/// Orders placed by a client
pub async fn orders(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Value>>, AppError> {
    owned_by(&state, &id, Collection::Orders).await
}

async fn owned_by(state: &AppState, client_id: &str, collection: Collection) -> Result<Json<Vec<Value>>, AppError> {
    let records = state.records();
    records.get(Collection::Clients, client_id).await?;

    let filters = vec![("clientId".to_string(), client_id.to_string())];
    Ok(Json(records.list(collection, &filters).await?))
}
