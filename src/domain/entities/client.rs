//! Client entity.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::Document;
use crate::domain::store::Collection;
use crate::shared::json::opt_string_or_number;

/// A vehicle owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(default, deserialize_with = "opt_string_or_number", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[validate(required(message = "is required"), length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,

    #[validate(required(message = "is required"), length(min = 1, message = "must not be empty"))]
    pub phone: Option<String>,

    #[validate(email(message = "must be a valid email address"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// National id or tax number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document for Client {
    const COLLECTION: Collection = Collection::Clients;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}
