use std::sync::Arc;

use folio_db::ProjectStore;

use crate::config::ServerConfig;
use crate::media::MediaHost;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Project storage (PostgreSQL or in-memory).
    pub store: Arc<dyn ProjectStore>,
    /// Server configuration (JWT secret, admin credential, limits).
    pub config: Arc<ServerConfig>,
    /// Image host; `None` when no credentials are configured.
    pub media: Option<Arc<dyn MediaHost>>,
}
