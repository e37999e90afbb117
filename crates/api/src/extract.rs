//! Request extractors with the API's error envelope.

use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` whose rejection renders as a `400 INVALID_INPUT` envelope
/// instead of axum's plain-text body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
