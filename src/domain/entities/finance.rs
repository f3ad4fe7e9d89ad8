//! Revenue and expense entities.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::Document;
use crate::domain::store::Collection;
use crate::shared::json::opt_string_or_number;
use crate::shared::validation::non_negative_decimal;

/// Money coming into the shop.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Revenue {
    #[serde(default, deserialize_with = "opt_string_or_number", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[validate(required(message = "is required"), length(min = 1, message = "must not be empty"))]
    pub description: Option<String>,

    #[validate(required(message = "is required"), custom(function = "non_negative_decimal"))]
    pub amount: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, deserialize_with = "opt_string_or_number", skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document for Revenue {
    const COLLECTION: Collection = Collection::Revenues;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

/// Money going out of the shop.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(default, deserialize_with = "opt_string_or_number", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[validate(required(message = "is required"), length(min = 1, message = "must not be empty"))]
    pub description: Option<String>,

    #[validate(required(message = "is required"), custom(function = "non_negative_decimal"))]
    pub amount: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document for Expense {
    const COLLECTION: Collection = Collection::Expenses;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}
