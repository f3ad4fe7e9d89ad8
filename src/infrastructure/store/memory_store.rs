//! In-process document store.
//!
//! Mirrors the semantics of the external document server closely enough to
//! run the whole API without it: string ids assigned on create, equality
//! filters, wholesale replace and shallow-merge patch.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use crate::domain::{Collection, DocumentStore, StoreError};
use crate::shared::json::{document_id, scalar_to_string};

/// Document store kept in memory.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, Vec<Value>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert documents as-is, bypassing id assignment. Used to seed fixtures.
    pub fn seed(&self, collection: Collection, docs: impl IntoIterator<Item = Value>) {
        self.collections
            .write()
            .entry(collection)
            .or_default()
            .extend(docs);
    }

    fn matches(doc: &Value, filters: &[(String, String)]) -> bool {
        filters
            .iter()
            // `_sort`, `_page` and friends are server directives, not fields
            .filter(|(key, _)| !key.starts_with('_'))
            .all(|(key, expected)| {
                doc.get(key)
                    .and_then(scalar_to_string)
                    .is_some_and(|actual| &actual == expected)
            })
    }

    fn ensure_object(doc: &Value) -> Result<(), StoreError> {
        if doc.is_object() {
            Ok(())
        } else {
            Err(StoreError::Status {
                status: 400,
                body: "document must be a JSON object".into(),
            })
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list(&self, collection: Collection, filters: &[(String, String)]) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.read();
        Ok(collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| Self::matches(doc, filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.read();
        Ok(collections.get(&collection).and_then(|docs| {
            docs.iter()
                .find(|doc| document_id(doc).as_deref() == Some(id))
                .cloned()
        }))
    }

    async fn create(&self, collection: Collection, mut doc: Value) -> Result<Value, StoreError> {
        Self::ensure_object(&doc)?;

        let id = match document_id(&doc) {
            Some(id) => id,
            None => uuid::Uuid::new_v4().simple().to_string(),
        };
        doc["id"] = Value::String(id.clone());

        let mut collections = self.collections.write();
        let docs = collections.entry(collection).or_default();
        if docs.iter().any(|d| document_id(d).as_deref() == Some(id.as_str())) {
            return Err(StoreError::Status {
                status: 409,
                body: format!("duplicate id {} in {}", id, collection),
            });
        }
        docs.push(doc.clone());
        Ok(doc)
    }

    async fn replace(&self, collection: Collection, id: &str, mut doc: Value) -> Result<Option<Value>, StoreError> {
        Self::ensure_object(&doc)?;
        doc["id"] = Value::String(id.to_string());

        let mut collections = self.collections.write();
        let Some(slot) = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| document_id(d).as_deref() == Some(id)))
        else {
            return Ok(None);
        };
        *slot = doc.clone();
        Ok(Some(doc))
    }

    async fn patch(&self, collection: Collection, id: &str, partial: Value) -> Result<Option<Value>, StoreError> {
        let Value::Object(fields) = partial else {
            return Err(StoreError::Status {
                status: 400,
                body: "patch must be a JSON object".into(),
            });
        };

        let mut collections = self.collections.write();
        let Some(slot) = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| document_id(d).as_deref() == Some(id)))
        else {
            return Ok(None);
        };

        if let Value::Object(target) = &mut *slot {
            for (key, value) in fields {
                if key != "id" {
                    target.insert(key, value);
                }
            }
        }
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<bool, StoreError> {
        let mut collections = self.collections.write();
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|d| document_id(d).as_deref() != Some(id));
        Ok(docs.len() != before)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
