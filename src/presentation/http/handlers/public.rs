//! Public Handlers
//!
//! Unauthenticated views reached from share links.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::application::dto::TrackingResponse;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Progress of an order: state, vehicle and history
pub async fn track_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TrackingResponse>, AppError> {
    Ok(Json(state.orders().tracking(&id).await?))
}
