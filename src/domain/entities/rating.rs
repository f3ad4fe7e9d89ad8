//! Rating entity.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::Document;
use crate::domain::store::Collection;
use crate::shared::json::opt_string_or_number;

/// A client's score for a finished order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    #[serde(default, deserialize_with = "opt_string_or_number", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "opt_string_or_number", skip_serializing_if = "Option::is_none")]
    #[validate(required(message = "is required"), length(min = 1, message = "must not be empty"))]
    pub order_id: Option<String>,

    #[serde(default, deserialize_with = "opt_string_or_number", skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// 1 to 5 stars
    #[validate(required(message = "is required"), range(min = 1, max = 5, message = "must be between 1 and 5"))]
    pub score: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document for Rating {
    const COLLECTION: Collection = Collection::Ratings;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}
