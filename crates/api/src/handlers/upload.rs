//! Handlers for the `/upload` resource (image upload and removal).
//!
//! Files are forwarded to the configured [`MediaHost`]; nothing is written
//! locally.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;
use folio_core::media::public_id_from_reference;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::media::{ImageUpload, MediaHost, UploadedImage};
use crate::middleware::auth::AdminUser;
use crate::response::{ApiResponse, DestroyBody};
use crate::state::AppState;

/// Multipart field carrying the file.
const IMAGE_FIELD: &str = "image";

/// Request body for `DELETE /upload/image`.
#[derive(Debug, Deserialize)]
pub struct DestroyRequest {
    /// Public id or full delivery URL of the image.
    pub filename: Option<String>,
}

fn media_host(state: &AppState) -> AppResult<Arc<dyn MediaHost>> {
    state.media.clone().ok_or(AppError::MediaDisabled)
}

/// POST /api/upload/image
///
/// Accepts a multipart form with a required `image` field holding an
/// `image/*` file.
pub async fn upload_image(
    admin: AdminUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<UploadedImage>>> {
    let media = media_host(&state)?;

    let mut upload: Option<ImageUpload> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("image/") {
            return Err(AppError::BadRequest("Only image files are allowed".into()));
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let bytes = field.bytes().await?;

        upload = Some(ImageUpload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    let upload = upload.ok_or_else(|| AppError::BadRequest("No image file provided".into()))?;
    if upload.bytes.is_empty() {
        return Err(AppError::BadRequest("Uploaded image is empty".into()));
    }

    let size = upload.bytes.len();
    let uploaded = media.upload(upload).await?;

    tracing::info!(
        public_id = %uploaded.public_id,
        size,
        jti = %admin.token_id,
        "Image uploaded"
    );
    Ok(Json(
        ApiResponse::ok(uploaded).with_message("Image uploaded successfully"),
    ))
}

/// DELETE /api/upload/image
///
/// `filename` may be a public id or a full delivery URL.
pub async fn delete_image(
    admin: AdminUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<DestroyRequest>,
) -> AppResult<Json<ApiResponse<DestroyBody>>> {
    let media = media_host(&state)?;

    let filename = input
        .filename
        .filter(|f| !f.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Filename is required".into()))?;
    let public_id = public_id_from_reference(&filename);

    let result = media.destroy(&public_id).await?;

    tracing::info!(public_id = %public_id, result = %result, jti = %admin.token_id, "Image deleted");
    Ok(Json(
        ApiResponse::ok(DestroyBody { result }).with_message("Image deleted successfully"),
    ))
}
