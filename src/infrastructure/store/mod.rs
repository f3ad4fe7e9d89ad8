//! Document store backends.

mod http_store;
mod memory_store;

use std::sync::Arc;

use crate::config::{StoreKind, StoreSettings};
use crate::domain::{DocumentStore, StoreError};

pub use http_store::HttpDocumentStore;
pub use memory_store::MemoryDocumentStore;

/// Build the backend selected in settings.
pub fn create_store(settings: &StoreSettings) -> Result<Arc<dyn DocumentStore>, StoreError> {
    match settings.kind {
        StoreKind::Http => Ok(Arc::new(HttpDocumentStore::new(settings)?)),
        StoreKind::Memory => {
            tracing::warn!("Using the in-memory document store; records are lost on restart");
            Ok(Arc::new(MemoryDocumentStore::new()))
        }
    }
}
