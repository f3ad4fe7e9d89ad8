//! Request DTOs
//!
//! Bodies of the non-record endpoints. Record endpoints take the entity types
//! from `domain::entities` directly.

use serde::Deserialize;
use validator::Validate;

use crate::domain::OrderState;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required(message = "is required"), email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(required(message = "is required"), length(min = 1, message = "must not be empty"))]
    pub password: Option<String>,
}

/// Move an order to another lifecycle state
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StateTransitionRequest {
    #[validate(required(message = "is required"))]
    pub state: Option<OrderState>,

    pub notes: Option<String>,

    pub changed_by: Option<String>,
}

/// Send an arbitrary email
#[derive(Debug, Deserialize, Validate)]
pub struct EmailRequest {
    #[validate(required(message = "is required"), email(message = "Invalid email format"))]
    pub to: Option<String>,

    #[validate(required(message = "is required"), length(min = 1, message = "must not be empty"))]
    pub subject: Option<String>,

    #[serde(alias = "content")]
    #[validate(required(message = "is required"), length(min = 1, message = "must not be empty"))]
    pub html: Option<String>,
}
