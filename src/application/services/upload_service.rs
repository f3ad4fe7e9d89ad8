//! Upload Service
//!
//! Accepts order photos, stores them and links them to the order.

use serde_json::json;

use super::record_service::{RecordError, RecordService};
use crate::application::dto::UploadResponse;
use crate::config::UploadSettings;
use crate::domain::{Collection, ServiceOrder};
use crate::infrastructure::uploads::{is_raster_image, PhotoStorage};

/// A file part received from a multipart form.
#[derive(Debug)]
pub struct IncomingPhoto {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

pub struct UploadService {
    records: RecordService,
    storage: PhotoStorage,
    max_bytes: usize,
}

impl UploadService {
    pub fn new(records: RecordService, settings: &UploadSettings) -> Self {
        Self {
            records,
            storage: PhotoStorage::new(settings),
            max_bytes: settings.max_bytes,
        }
    }

    /// Store a photo; with an order id, append its URL to the order's photos.
    pub async fn accept(&self, photo: IncomingPhoto, order_id: Option<&str>) -> Result<UploadResponse, RecordError> {
        let content_type = photo.content_type.as_deref().unwrap_or_default();
        if !is_raster_image(content_type) {
            return Err(RecordError::BadRequest(
                "Only JPEG, PNG, GIF, WebP, BMP, HEIC, AVIF or TIFF images can be uploaded".into(),
            ));
        }
        if photo.bytes.is_empty() {
            return Err(RecordError::BadRequest("Uploaded file is empty".into()));
        }
        if photo.bytes.len() > self.max_bytes {
            return Err(RecordError::BadRequest(format!(
                "File exceeds the {} byte limit",
                self.max_bytes
            )));
        }

        let order = match order_id {
            Some(id) => Some(self.records.fetch::<ServiceOrder>(id).await?),
            None => None,
        };

        let stored = self
            .storage
            .save(photo.file_name.as_deref(), content_type, &photo.bytes)
            .await
            .map_err(|e| RecordError::Internal(format!("Could not store upload: {}", e)))?;

        if let (Some(id), Some(mut order)) = (order_id, order) {
            order.photos.push(stored.url.clone());
            self.records
                .patch(Collection::Orders, id, json!({ "photos": order.photos }))
                .await?;
            tracing::info!(order_id = %id, url = %stored.url, "Photo attached to order");
        }

        Ok(UploadResponse {
            url: stored.url,
            filename: stored.filename,
            size: stored.size,
        })
    }
}
