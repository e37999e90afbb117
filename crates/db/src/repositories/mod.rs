//! Repository layer.
//!
//! [`ProjectRepo`] is a zero-sized struct providing async queries that
//! accept `&PgPool` as the first argument; [`PgProjectStore`] adapts it to
//! the [`ProjectStore`](crate::store::ProjectStore) trait.

pub mod project_repo;

pub use project_repo::{PgProjectStore, ProjectRepo};
