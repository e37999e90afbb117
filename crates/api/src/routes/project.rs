//! Route definitions for the `/projects` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// `reorder` is a reserved slug, so the static segment never hides a project.
///
/// ```text
/// GET    /                  -> list
/// POST   /                  -> create
/// PUT    /reorder           -> reorder
/// GET    /{slug}            -> get_by_slug
/// PUT    /{slug}            -> update
/// DELETE /{slug}            -> delete
/// GET    /{slug}/others     -> others
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/reorder", put(project::reorder))
        .route(
            "/{slug}",
            get(project::get_by_slug)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{slug}/others", get(project::others))
}
