//! # Domain Layer
//!
//! Records, value types and the ports the rest of the crate talks through.
//!
//! ## Structure
//!
//! - **entities**: typed views of the documents kept in the store
//! - **value_objects**: order lifecycle states and user roles
//! - **store**: the document-store port (`DocumentStore`, `Collection`)
//! - **mailer**: the outgoing email port (`Mailer`)
//!
//! Nothing in here knows about HTTP, reqwest or axum.

pub mod entities;
pub mod mailer;
pub mod store;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use mailer::{EmailMessage, Mailer, MailerError};
pub use store::{Collection, DocumentStore, Filters, StoreError};
pub use value_objects::*;
