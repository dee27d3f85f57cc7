// src/handlers/upload.rs

use axum::{Json, extract::Multipart, response::IntoResponse};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;

use crate::error::AppError;

/// Upload size cap, before base64 expansion.
const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Accept an image and hand back an opaque reference: a `data:` URL with the
/// bytes base64-encoded. No resizing or re-encoding happens here; image
/// hosting proper is outside this service.
pub async fn upload_image(mut multipart: Multipart) -> Result<impl IntoResponse, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field
            .content_type()
            .map(str::to_owned)
            .ok_or_else(|| AppError::Validation("File content type is missing".to_string()))?;

        if !content_type.starts_with("image/") {
            return Err(AppError::Validation(
                "The file must be an image".to_string(),
            ));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;

        if data.len() > MAX_IMAGE_BYTES {
            return Err(AppError::Validation(
                "The image is too large (max 5MB)".to_string(),
            ));
        }

        let url = format!("data:{};base64,{}", content_type, STANDARD.encode(&data));

        tracing::debug!(
            size = data.len(),
            content_type = %content_type,
            "Image encoded as data URL"
        );

        return Ok(Json(json!({ "url": url })));
    }

    Err(AppError::Validation("No file provided".to_string()))
}
