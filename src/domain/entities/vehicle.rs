//! Vehicle entity.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::Document;
use crate::domain::store::Collection;
use crate::shared::json::opt_string_or_number;

/// A client's vehicle.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(default, deserialize_with = "opt_string_or_number", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Owner (`clients` id)
    #[serde(default, deserialize_with = "opt_string_or_number", skip_serializing_if = "Option::is_none")]
    #[validate(required(message = "is required"), length(min = 1, message = "must not be empty"))]
    pub client_id: Option<String>,

    /// License plate
    #[validate(required(message = "is required"), length(min = 1, message = "must not be empty"))]
    pub plate: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[validate(range(min = 1900, max = 2100, message = "must be a plausible model year"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mileage: Option<u64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Vehicle {
    /// "Brand Model (year)" with whatever parts are known.
    pub fn description(&self) -> String {
        let mut parts: Vec<String> = [self.brand.as_deref(), self.model.as_deref()]
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect();
        if let Some(year) = self.year {
            parts.push(format!("({})", year));
        }
        parts.join(" ")
    }
}

impl Document for Vehicle {
    const COLLECTION: Collection = Collection::Vehicles;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}
