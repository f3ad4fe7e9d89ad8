//! User entity.
//!
//! Stored in the `users` collection.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::Document;
use crate::domain::store::Collection;
use crate::domain::value_objects::Role;
use crate::shared::json::opt_string_or_number;

/// A shop account.
///
/// `password` holds an Argon2 PHC string once written by this service. Rows
/// seeded by hand may still carry a plain password.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, deserialize_with = "opt_string_or_number", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[validate(required(message = "is required"), length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,

    #[validate(required(message = "is required"), email(message = "must be a valid email address"))]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[validate(required(message = "is required"))]
    pub role: Option<Role>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Email compared case-insensitively.
    pub fn normalized_email(&self) -> Option<String> {
        self.email.as_deref().map(|e| e.trim().to_lowercase())
    }
}

impl Document for User {
    const COLLECTION: Collection = Collection::Users;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}
