//! Service order entity and its embedded quotation.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::Document;
use crate::domain::store::Collection;
use crate::domain::value_objects::OrderState;
use crate::shared::json::opt_string_or_number;
use crate::shared::validation::{non_negative_decimal, positive_decimal};

/// VAT applied to a quotation when `applyTax` is set (19%).
pub fn tax_rate() -> Decimal {
    Decimal::new(19, 2)
}

/// A repair job for one vehicle.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrder {
    #[serde(default, deserialize_with = "opt_string_or_number", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "opt_string_or_number", skip_serializing_if = "Option::is_none")]
    #[validate(required(message = "is required"), length(min = 1, message = "must not be empty"))]
    pub client_id: Option<String>,

    #[serde(default, deserialize_with = "opt_string_or_number", skip_serializing_if = "Option::is_none")]
    #[validate(required(message = "is required"), length(min = 1, message = "must not be empty"))]
    pub vehicle_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<OrderState>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "opt_string_or_number", skip_serializing_if = "Option::is_none")]
    pub technician_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[validate(nested)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quotation: Option<Quotation>,

    /// Uploaded photo URLs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServiceOrder {
    /// Current state; orders written before the lifecycle existed count as received.
    pub fn current_state(&self) -> OrderState {
        self.state.unwrap_or_default()
    }

    /// Quotation totals, zero when no quotation has been made.
    pub fn totals(&self) -> QuotationTotals {
        self.quotation
            .as_ref()
            .map(Quotation::totals)
            .unwrap_or_default()
    }
}

impl Document for ServiceOrder {
    const COLLECTION: Collection = Collection::Orders;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

/// Priced list of services proposed for an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    #[validate(nested)]
    #[serde(default)]
    pub items: Vec<QuotationItem>,

    #[serde(default)]
    pub apply_tax: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One priced line of a quotation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuotationItem {
    #[validate(required(message = "is required"), length(min = 1, message = "must not be empty"))]
    pub description: Option<String>,

    #[validate(required(message = "is required"), custom(function = "positive_decimal"))]
    pub quantity: Option<Decimal>,

    #[validate(required(message = "is required"), custom(function = "non_negative_decimal"))]
    pub unit_price: Option<Decimal>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QuotationItem {
    pub fn line_total(&self) -> Decimal {
        self.quantity.unwrap_or_default() * self.unit_price.unwrap_or_default()
    }
}

/// Computed amounts of a quotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl Quotation {
    /// subtotal = Σ quantity × unit price; tax = 19% of the subtotal (rounded to
    /// cents, half away from zero) when `apply_tax`; total = subtotal + tax.
    pub fn totals(&self) -> QuotationTotals {
        let subtotal: Decimal = self.items.iter().map(QuotationItem::line_total).sum();
        let tax = if self.apply_tax {
            (subtotal * tax_rate()).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        } else {
            Decimal::ZERO
        };

        QuotationTotals {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}
