//! Reorder coordinator.
//!
//! Turns a client-supplied sequence of slugs into `order = index` for each
//! named project, as a single all-or-nothing store operation, and answers
//! with the canonical listing so the caller can replace its view wholesale.

use folio_core::reorder::{missing_slugs, validate_order_input, ReorderError};

use crate::models::project::Project;
use crate::store::{ProjectStore, StoreError};

/// Apply `order` and return the freshly sorted listing.
///
/// Projects not named in `order` keep their current `order` value, which
/// may leave ties or gaps; that is accepted rather than corrected.
///
/// # Errors
///
/// - [`ReorderError::InvalidInput`] before any store access.
/// - [`ReorderError::UnknownSlugs`] when a slug names no project; nothing
///   is written.
/// - [`ReorderError::ConcurrentModification`] when a project vanished
///   between validation and the transaction; rolled back.
/// - [`ReorderError::StorageFailure`] on any backend error; rolled back.
pub async fn reorder_projects(
    store: &dyn ProjectStore,
    order: &[String],
) -> Result<Vec<Project>, ReorderError> {
    validate_order_input(order)?;

    let existing = store.list_all().await.map_err(storage_failure)?;
    let missing = missing_slugs(order, existing.iter().map(|p| p.slug.as_str()));
    if !missing.is_empty() {
        tracing::warn!(?missing, "Reorder rejected: unknown slugs");
        return Err(ReorderError::UnknownSlugs(missing));
    }

    store.bulk_set_order(order).await.map_err(|err| match err {
        StoreError::ConcurrentModification { .. } | StoreError::NotFound(_) => {
            tracing::warn!(error = %err, "Reorder aborted: projects changed concurrently");
            ReorderError::ConcurrentModification(err.to_string())
        }
        other => storage_failure(other),
    })?;

    tracing::info!(count = order.len(), "Projects reordered");

    store.list_all().await.map_err(|err| {
        tracing::error!(error = %err, "Reorder committed but the listing could not be reloaded");
        ReorderError::StorageFailure(format!(
            "order was saved but the listing could not be reloaded: {err}"
        ))
    })
}

fn storage_failure(err: StoreError) -> ReorderError {
    tracing::error!(error = %err, "Reorder storage failure");
    ReorderError::StorageFailure(err.to_string())
}
