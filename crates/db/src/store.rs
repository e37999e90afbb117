//! The project storage seam.

use async_trait::async_trait;

use crate::models::project::{Project, ProjectDraft};

/// Failures reported by a [`ProjectStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Project '{0}' not found")]
    NotFound(String),

    #[error("A project with slug '{0}' already exists")]
    Conflict(String),

    /// A multi-record write found fewer records than it was asked to touch.
    #[error("Expected {expected} projects but found {found}")]
    ConcurrentModification { expected: usize, found: usize },

    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Durable collection of projects keyed by slug.
///
/// Implementations must enforce slug uniqueness and make
/// [`bulk_set_order`](ProjectStore::bulk_set_order) all-or-nothing.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Every project, sorted by `order` ascending then `created_at`
    /// descending.
    async fn list_all(&self) -> Result<Vec<Project>, StoreError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Project>, StoreError>;

    /// Insert a new project placed after every existing one.
    ///
    /// Fails with [`StoreError::Conflict`] if the slug is taken.
    async fn insert(&self, draft: &ProjectDraft) -> Result<Project, StoreError>;

    /// Replace the content of the project at `slug`, keeping its `order`
    /// and `created_at` and refreshing `updated_at`.
    async fn replace(&self, slug: &str, draft: &ProjectDraft) -> Result<Project, StoreError>;

    async fn delete_by_slug(&self, slug: &str) -> Result<(), StoreError>;

    /// Set each named project's `order` to its index in `order`, in one
    /// transaction. On any error no project's `order` has changed.
    async fn bulk_set_order(&self, order: &[String]) -> Result<(), StoreError>;

    /// Confirm the backend is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;
}
