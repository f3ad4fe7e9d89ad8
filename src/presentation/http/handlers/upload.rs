//! Photo Upload Handler

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::UploadResponse;
use crate::application::services::IncomingPhoto;
use crate::shared::error::AppError;
use crate::startup::AppState;

const FILE_FIELDS: [&str; 2] = ["photo", "file"];

/// Multipart upload: a `photo` (or `file`) part and an optional `orderId`
pub async fn upload_photo(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let mut photo = None;
    let mut order_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "orderId" {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            let value = value.trim();
            if !value.is_empty() {
                order_id = Some(value.to_string());
            }
        } else if FILE_FIELDS.contains(&name.as_str()) && photo.is_none() {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;

            photo = Some(IncomingPhoto {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
        }
    }

    let photo = photo.ok_or_else(|| AppError::missing_field("photo"))?;
    let response = state.uploads().accept(photo, order_id.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
