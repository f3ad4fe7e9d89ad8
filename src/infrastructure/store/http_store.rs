//! Reqwest-backed client for the external JSON-document server.
//!
//! Resources are addressed as `{base}/{collection}` and
//! `{base}/{collection}/{id}`; list filters travel as query parameters.
//! A 404 means "no such document" and is reported as `None`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::StoreSettings;
use crate::domain::{Collection, DocumentStore, StoreError};
use crate::infrastructure::metrics;

pub struct HttpDocumentStore {
    client: Client,
    base_url: Url,
}

impl HttpDocumentStore {
    pub fn new(settings: &StoreSettings) -> Result<Self, StoreError> {
        let base_url = Url::parse(&settings.url)
            .map_err(|e| StoreError::Config(format!("invalid store url {}: {}", settings.url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::Config(format!("store url {} cannot be a base", settings.url)));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| StoreError::Config(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    fn url(&self, collection: Collection, id: Option<&str>) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| StoreError::Config("store url cannot be a base".into()))?;
            segments.pop_if_empty().push(collection.path());
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// Send a request and decode the JSON body. `Ok(None)` on 404.
    async fn execute(
        &self,
        operation: &'static str,
        collection: Collection,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<Option<Value>, StoreError> {
        let start = Instant::now();
        debug!(%method, %url, "Document store request");

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(operation, collection = %collection, error = %e, "Document store unreachable");
            StoreError::Transport(e.to_string())
        });
        metrics::record_store_request(operation, collection.path(), start.elapsed().as_secs_f64());
        let response = response?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        if bytes.is_empty() {
            return Ok(Some(Value::Null));
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn list(&self, collection: Collection, filters: &[(String, String)]) -> Result<Vec<Value>, StoreError> {
        let mut url = self.url(collection, None)?;
        if !filters.is_empty() {
            url.query_pairs_mut().extend_pairs(filters);
        }

        match self.execute("list", collection, Method::GET, url, None).await? {
            Some(Value::Array(docs)) => Ok(docs),
            // A collection the server doesn't know yet is just empty
            None => Ok(Vec::new()),
            Some(other) => Err(StoreError::Status {
                status: 200,
                body: format!("expected a JSON array for {}, got {}", collection, other),
            }),
        }
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, StoreError> {
        let url = self.url(collection, Some(id))?;
        self.execute("get", collection, Method::GET, url, None).await
    }

    async fn create(&self, collection: Collection, doc: Value) -> Result<Value, StoreError> {
        let url = self.url(collection, None)?;
        self.execute("create", collection, Method::POST, url, Some(&doc))
            .await?
            .ok_or_else(|| StoreError::Status {
                status: 404,
                body: format!("collection {} does not exist", collection),
            })
    }

    async fn replace(&self, collection: Collection, id: &str, doc: Value) -> Result<Option<Value>, StoreError> {
        let url = self.url(collection, Some(id))?;
        self.execute("replace", collection, Method::PUT, url, Some(&doc)).await
    }

    async fn patch(&self, collection: Collection, id: &str, partial: Value) -> Result<Option<Value>, StoreError> {
        let url = self.url(collection, Some(id))?;
        self.execute("patch", collection, Method::PATCH, url, Some(&partial)).await
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<bool, StoreError> {
        let url = self.url(collection, Some(id))?;
        Ok(self
            .execute("delete", collection, Method::DELETE, url, None)
            .await?
            .is_some())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let url = self.url(Collection::Users, None)?;
        self.execute("ping", Collection::Users, Method::HEAD, url, None)
            .await
            .map(|_| ())
    }
}
