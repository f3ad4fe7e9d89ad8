//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! ## Value Objects
//!
//! - **OrderState**: service-order lifecycle with its transition rules
//! - **Role**: account role (admin, client, technician, quality)

mod order_state;
mod role;

pub use order_state::*;
pub use role::*;
