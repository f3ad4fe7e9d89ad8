//! Order Handlers

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

use super::upserted;
use crate::application::dto::{QuotationResponse, ShareLinkResponse, StateTransitionRequest};
use crate::domain::ServiceOrder;
use crate::presentation::http::extractors::ValidJson;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// List orders; query parameters are equality filters
pub async fn list_orders(
    State(state): State<AppState>,
    Query(filters): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Value>>, AppError> {
    Ok(Json(state.orders().list(&filters).await?))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.orders().get(&id).await?))
}

/// Create an order in reception
pub async fn create_order(
    State(state): State<AppState>,
    ValidJson(order): ValidJson<ServiceOrder>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let created = state.orders().create(order).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace an order, creating it under the path id when missing
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(order): ValidJson<ServiceOrder>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    Ok(upserted(state.orders().upsert(&id, order).await?))
}

/// Delete an order and its history
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.orders().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Move an order to its next lifecycle state
pub async fn change_state(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(body): ValidJson<StateTransitionRequest>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.orders().transition(&id, body).await?))
}

pub async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Value>>, AppError> {
    Ok(Json(state.orders().history(&id).await?))
}

pub async fn get_quotation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<QuotationResponse>, AppError> {
    Ok(Json(state.orders().quotation(&id).await?))
}

/// Invoice as a PDF download
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let pdf = state.orders().invoice(&id).await?;
    let disposition = format!("attachment; filename=\"invoice-{}.pdf\"", sanitize_file_name(&id));

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    ))
}

pub async fn get_share_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ShareLinkResponse>, AppError> {
    Ok(Json(state.orders().share_link(&id).await?))
}

fn sanitize_file_name(id: &str) -> String {
    id.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect()
}
