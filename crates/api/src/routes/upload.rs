//! Route definitions for the `/upload` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::upload;
use crate::state::AppState;

/// Routes mounted at `/upload`, with request bodies capped at
/// `max_upload_bytes`.
///
/// ```text
/// POST   /image     -> upload_image
/// DELETE /image     -> delete_image
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/image",
            post(upload::upload_image).delete(upload::delete_image),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
