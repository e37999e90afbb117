//! Persistence for portfolio projects.
//!
//! - [`store::ProjectStore`] -- the storage seam the API and the reorder
//!   coordinator depend on.
//! - [`repositories::PgProjectStore`] -- PostgreSQL implementation.
//! - [`memory::MemoryProjectStore`] -- in-process implementation with the
//!   same transactional guarantees.
//! - [`reorder`] -- the all-or-nothing reorder coordinator.

pub mod memory;
pub mod models;
pub mod reorder;
pub mod repositories;
pub mod store;

use sqlx::postgres::PgPoolOptions;

pub use memory::MemoryProjectStore;
pub use repositories::PgProjectStore;
pub use store::{ProjectStore, StoreError};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
