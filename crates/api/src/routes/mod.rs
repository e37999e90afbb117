pub mod auth;
pub mod health;
pub mod project;
pub mod upload;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                      login (public)
/// /auth/verify                     token check (public)
///
/// /projects                        list (public), create (admin)
/// /projects/reorder                reorder (admin, PUT)
/// /projects/{slug}                 get (public), replace, delete (admin)
/// /projects/{slug}/others          other project cards (public)
///
/// /upload/image                    upload (POST), delete (DELETE) (admin)
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/projects", project::router())
        .nest("/upload", upload::router(config.max_upload_bytes))
}
