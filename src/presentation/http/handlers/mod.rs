//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

pub mod auth;
pub mod clients;
pub mod email;
pub mod health;
pub mod orders;
pub mod public;
pub mod records;
pub mod reports;
pub mod upload;
pub mod users;

use axum::{http::StatusCode, Json};
use serde_json::Value;

use crate::application::services::Upserted;

/// 201 when an update created the record, 200 when it replaced one.
pub(crate) fn upserted(outcome: Upserted) -> (StatusCode, Json<Value>) {
    let status = if outcome.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    (status, Json(outcome.into_document()))
}
