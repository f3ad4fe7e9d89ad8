//! Record Service
//!
//! Generic pass-through CRUD over the document store. Reads relay the stored
//! documents untouched; writes go through the typed entity so presence checks
//! run and unknown fields are written back as received.

use std::sync::Arc;

use serde_json::Value;
use validator::{Validate, ValidationErrors};

use crate::domain::entities::Document;
use crate::domain::{Collection, DocumentStore, StoreError};
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;

/// Record service errors
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("{0}")]
    NotFound(String),

    #[error("Invalid record: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RecordError {
    pub fn not_found(collection: Collection, id: &str) -> Self {
        RecordError::NotFound(format!("{} {} not found", collection.noun(), id))
    }
}

impl From<RecordError> for AppError {
    fn from(e: RecordError) -> Self {
        match e {
            RecordError::NotFound(msg) => AppError::NotFound(msg),
            RecordError::Invalid(errors) => validation_error(errors),
            RecordError::MissingField(field) => AppError::missing_field(field),
            RecordError::BadRequest(msg) => AppError::BadRequest(msg),
            RecordError::Forbidden(msg) => AppError::Forbidden(msg),
            RecordError::Conflict(msg) => AppError::Conflict(msg),
            RecordError::Store(e) => AppError::Store(e),
            RecordError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Outcome of an update-or-create.
#[derive(Debug, Clone, PartialEq)]
pub enum Upserted {
    Replaced(Value),
    Created(Value),
}

impl Upserted {
    pub fn is_created(&self) -> bool {
        matches!(self, Upserted::Created(_))
    }

    pub fn document(&self) -> &Value {
        match self {
            Upserted::Replaced(doc) | Upserted::Created(doc) => doc,
        }
    }

    pub fn into_document(self) -> Value {
        match self {
            Upserted::Replaced(doc) | Upserted::Created(doc) => doc,
        }
    }

    /// Apply `f` to the contained document.
    pub fn map(self, f: impl FnOnce(Value) -> Value) -> Self {
        match self {
            Upserted::Replaced(doc) => Upserted::Replaced(f(doc)),
            Upserted::Created(doc) => Upserted::Created(f(doc)),
        }
    }
}

/// CRUD over any collection.
#[derive(Clone)]
pub struct RecordService {
    store: Arc<dyn DocumentStore>,
}

impl RecordService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, collection: Collection, filters: &[(String, String)]) -> Result<Vec<Value>, RecordError> {
        Ok(self.store.list(collection, filters).await?)
    }

    pub async fn get(&self, collection: Collection, id: &str) -> Result<Value, RecordError> {
        self.lookup(collection, id)
            .await?
            .ok_or_else(|| RecordError::not_found(collection, id))
    }

    /// Stored document as-is, `None` when missing. Works for rows that no
    /// longer match the entity shape.
    pub async fn lookup(&self, collection: Collection, id: &str) -> Result<Option<Value>, RecordError> {
        Ok(self.store.get(collection, id).await?)
    }

    /// Fetch and decode a record, `None` when missing.
    pub async fn find<T: Document>(&self, id: &str) -> Result<Option<T>, RecordError> {
        match self.store.get(T::COLLECTION, id).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc).map_err(StoreError::from)?)),
            None => Ok(None),
        }
    }

    /// Fetch and decode a record, 404 when missing.
    pub async fn fetch<T: Document>(&self, id: &str) -> Result<T, RecordError> {
        self.find(id)
            .await?
            .ok_or_else(|| RecordError::not_found(T::COLLECTION, id))
    }

    /// Validate and insert a new record.
    pub async fn create<T: Document>(&self, record: T) -> Result<Value, RecordError> {
        record.validate()?;
        let doc = serde_json::to_value(&record).map_err(StoreError::from)?;

        let created = self.store.create(T::COLLECTION, doc).await?;
        tracing::debug!(collection = %T::COLLECTION, id = ?record.id(), "Record created");
        Ok(created)
    }

    /// Replace the record with `id`, creating it under that id when missing.
    pub async fn upsert<T: Document>(&self, id: &str, mut record: T) -> Result<Upserted, RecordError> {
        record.validate()?;
        record.set_id(id.to_string());
        let doc = serde_json::to_value(&record).map_err(StoreError::from)?;
        self.upsert_document(T::COLLECTION, id, doc).await
    }

    /// Update-or-create with an already validated document.
    pub async fn upsert_document(&self, collection: Collection, id: &str, mut doc: Value) -> Result<Upserted, RecordError> {
        if let Value::Object(fields) = &mut doc {
            fields.insert("id".into(), Value::String(id.to_string()));
        }

        if let Some(replaced) = self.store.replace(collection, id, doc.clone()).await? {
            return Ok(Upserted::Replaced(replaced));
        }

        tracing::info!(collection = %collection, id = %id, "Record missing on update, creating it");
        let created = self.store.create(collection, doc).await?;
        Ok(Upserted::Created(created))
    }

    /// Shallow-merge fields into an existing record.
    pub async fn patch(&self, collection: Collection, id: &str, partial: Value) -> Result<Value, RecordError> {
        self.store
            .patch(collection, id, partial)
            .await?
            .ok_or_else(|| RecordError::not_found(collection, id))
    }

    pub async fn delete(&self, collection: Collection, id: &str) -> Result<(), RecordError> {
        if self.store.delete(collection, id).await? {
            tracing::debug!(collection = %collection, id = %id, "Record deleted");
            Ok(())
        } else {
            Err(RecordError::not_found(collection, id))
        }
    }

    /// List and decode, skipping documents that don't match the entity shape.
    pub async fn list_typed<T: Document>(&self, filters: &[(String, String)]) -> Result<Vec<T>, RecordError> {
        let docs = self.store.list(T::COLLECTION, filters).await?;
        Ok(decode_lenient(T::COLLECTION, docs))
    }
}

/// Decode documents, logging and dropping the ones that fail.
pub fn decode_lenient<T: Document>(collection: Collection, docs: Vec<Value>) -> Vec<T> {
    docs.into_iter()
        .filter_map(|doc| match serde_json::from_value::<T>(doc) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(collection = %collection, error = %e, "Skipping malformed document");
                None
            }
        })
        .collect()
}

/// Validate a record without touching the store.
pub fn check<T: Validate>(record: &T) -> Result<(), RecordError> {
    Ok(record.validate()?)
}
