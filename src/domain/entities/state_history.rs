//! State history entry entity.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::Document;
use crate::domain::store::Collection;
use crate::domain::value_objects::OrderState;
use crate::shared::json::opt_string_or_number;

/// One lifecycle transition of a service order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StateHistoryEntry {
    #[serde(default, deserialize_with = "opt_string_or_number", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "opt_string_or_number", skip_serializing_if = "Option::is_none")]
    #[validate(required(message = "is required"), length(min = 1, message = "must not be empty"))]
    pub order_id: Option<String>,

    #[validate(required(message = "is required"))]
    pub state: Option<OrderState>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_state: Option<OrderState>,

    /// RFC 3339 timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed_at: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed_by: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StateHistoryEntry {
    /// Entry for a transition happening now.
    pub fn record(order_id: &str, previous: Option<OrderState>, state: OrderState) -> Self {
        Self {
            order_id: Some(order_id.to_string()),
            state: Some(state),
            previous_state: previous,
            changed_at: Some(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)),
            ..Default::default()
        }
    }
}

impl Document for StateHistoryEntry {
    const COLLECTION: Collection = Collection::StateHistory;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}
