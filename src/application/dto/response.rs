//! Response DTOs
//!
//! Data structures for API response bodies. Records themselves are relayed as
//! the store returned them; these cover the computed views.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::domain::{OrderState, QuotationItem, QuotationTotals};

/// Successful login
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    /// The user record without its password
    pub user: Value,
}

/// Quotation of an order with computed totals
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationResponse {
    pub order_id: String,
    pub items: Vec<QuotationLine>,
    pub apply_tax: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub totals: QuotationTotals,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationLine {
    #[serde(flatten)]
    pub item: QuotationItem,
    pub line_total: Decimal,
}

/// Shareable tracking link
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLinkResponse {
    pub order_id: String,
    pub url: String,
}

/// Public view of an order's progress
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingResponse {
    pub id: String,
    pub state: OrderState,
    pub state_label: &'static str,
    pub vehicle: Option<TrackingVehicle>,
    pub history: Vec<TrackingEntry>,
}

#[derive(Debug, Serialize)]
pub struct TrackingVehicle {
    pub plate: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEntry {
    pub state: OrderState,
    pub state_label: &'static str,
    pub changed_at: Option<String>,
}

/// Shop-wide figures
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_revenue: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
    pub total_orders: usize,
    pub orders_by_state: BTreeMap<&'static str, usize>,
    pub average_rating: Option<f64>,
    pub ratings_count: usize,
}

/// Stored photo
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
    pub filename: String,
    pub size: usize,
}

/// Email accepted by the provider
#[derive(Debug, Serialize)]
pub struct EmailSentResponse {
    pub message: &'static str,
    pub id: String,
}
