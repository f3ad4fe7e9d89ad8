//! # Domain Entities
//!
//! Records kept in the document store. Each entity is a flat JSON document;
//! fields this service does not know about are carried in `extra` and written
//! back untouched, so the store stays the source of truth for the shape.
//!
//! ## Entities
//!
//! - **User**: account with role and credentials
//! - **Client**: vehicle owner
//! - **Vehicle**: a client's car, referenced by orders
//! - **ServiceOrder**: a repair job with its embedded quotation
//! - **StateHistoryEntry**: one lifecycle transition of an order
//! - **Rating**, **Report**: client feedback and technician reports on an order
//! - **Revenue**, **Expense**: shop bookkeeping

mod client;
mod finance;
mod order;
mod rating;
mod report;
mod state_history;
mod user;
mod vehicle;

use serde::{de::DeserializeOwned, Serialize};
use validator::Validate;

use super::store::Collection;

pub use client::Client;
pub use finance::{Expense, Revenue};
pub use order::{tax_rate, Quotation, QuotationItem, QuotationTotals, ServiceOrder};
pub use rating::Rating;
pub use report::Report;
pub use state_history::StateHistoryEntry;
pub use user::User;
pub use vehicle::Vehicle;

/// A typed record stored in one collection of the document store.
pub trait Document: Serialize + DeserializeOwned + Validate + Send + Sync + 'static {
    /// Collection the record lives in.
    const COLLECTION: Collection;

    fn id(&self) -> Option<&str>;

    fn set_id(&mut self, id: String);
}
