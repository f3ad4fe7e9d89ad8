//! Report Handlers
//!
//! Report CRUD goes through `records`; this adds the summary.

use axum::{extract::State, Json};

use crate::application::dto::ReportSummary;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Revenue, expenses, orders per state and rating average
pub async fn summary(State(state): State<AppState>) -> Result<Json<ReportSummary>, AppError> {
    Ok(Json(state.reports().summary().await?))
}
