use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use folio_core::error::CoreError;
use folio_core::reorder::ReorderError;
use folio_db::StoreError;
use serde_json::{json, Value};

use crate::media::MediaError;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain, store, reorder and media errors and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce the failure envelope
/// `{ "success": false, "code", "message", "details"? }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `folio_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A project store failure outside the reorder path.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A rejected or failed reorder.
    #[error(transparent)]
    Reorder(#[from] ReorderError),

    /// The media host failed.
    #[error(transparent)]
    Media(#[from] MediaError),

    /// Upload routes hit while no media host is configured.
    #[error("Image uploads are not configured")]
    MediaDisabled,

    /// The request body was not acceptable JSON.
    #[error(transparent)]
    JsonBody(#[from] JsonRejection),

    /// The multipart body could not be read.
    #[error(transparent)]
    Multipart(#[from] MultipartError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut details: Option<Value> = None;

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, key } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} '{key}' not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        INTERNAL_MESSAGE.to_string(),
                    )
                }
            },

            // --- Store errors ---
            AppError::Store(err) => match err {
                StoreError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
                StoreError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT", err.to_string()),
                StoreError::ConcurrentModification { .. } => (
                    StatusCode::CONFLICT,
                    "CONCURRENT_MODIFICATION",
                    err.to_string(),
                ),
                StoreError::Backend(msg) => {
                    tracing::error!(error = %msg, "Store error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        INTERNAL_MESSAGE.to_string(),
                    )
                }
            },

            // --- Reorder errors ---
            AppError::Reorder(err) => match err {
                ReorderError::InvalidInput(msg) => {
                    (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg.clone())
                }
                ReorderError::UnknownSlugs(missing) => {
                    details = Some(json!({ "missing": missing }));
                    (StatusCode::BAD_REQUEST, "UNKNOWN_SLUGS", err.to_string())
                }
                ReorderError::ConcurrentModification(_) => (
                    StatusCode::CONFLICT,
                    "CONCURRENT_MODIFICATION",
                    "Projects changed while reordering; reload and try again".to_string(),
                ),
                ReorderError::StorageFailure(msg) => {
                    tracing::error!(error = %msg, "Reorder storage failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "STORAGE_FAILURE",
                        "Failed to save the new order".to_string(),
                    )
                }
            },

            // --- Media errors ---
            AppError::Media(err) => {
                tracing::error!(error = %err, "Media host error");
                (
                    StatusCode::BAD_GATEWAY,
                    "MEDIA_ERROR",
                    "The image host rejected the request".to_string(),
                )
            }
            AppError::MediaDisabled => (
                StatusCode::SERVICE_UNAVAILABLE,
                "MEDIA_DISABLED",
                self.to_string(),
            ),

            // --- Request body errors ---
            AppError::JsonBody(rejection) => (
                StatusCode::BAD_REQUEST,
                "INVALID_INPUT",
                rejection.body_text(),
            ),
            AppError::Multipart(err) => {
                if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    (
                        StatusCode::PAYLOAD_TOO_LARGE,
                        "PAYLOAD_TOO_LARGE",
                        "File is too large".to_string(),
                    )
                } else {
                    (StatusCode::BAD_REQUEST, "BAD_REQUEST", err.body_text())
                }
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        };

        let mut body = json!({
            "success": false,
            "code": code,
            "message": message,
        });
        if let Some(details) = details {
            body["details"] = details;
        }

        (status, axum::Json(body)).into_response()
    }
}

