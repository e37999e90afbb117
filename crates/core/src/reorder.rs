//! Input rules for reordering projects.
//!
//! The store-facing half of the protocol lives in `folio_db::reorder`;
//! this module holds the checks that must pass before any storage access.

use std::collections::HashSet;

use crate::types::SortOrder;

/// Why a reorder request did not change anything.
///
/// Every variant guarantees the stored ordering is exactly as it was
/// before the call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReorderError {
    /// The request was not a non-empty list of distinct slugs.
    #[error("Invalid reorder input: {0}")]
    InvalidInput(String),

    /// Some requested slugs do not name an existing project.
    #[error("Unknown projects: {}", .0.join(", "))]
    UnknownSlugs(Vec<String>),

    /// The set of projects changed between validation and commit.
    #[error("Projects changed while reordering: {0}")]
    ConcurrentModification(String),

    /// The underlying store failed; the transaction was rolled back.
    #[error("Storage failure while reordering: {0}")]
    StorageFailure(String),
}

/// Check the shape of a requested ordering.
///
/// The list must be non-empty, every slug non-blank, and no slug may appear
/// twice (a project cannot sit at two positions).
pub fn validate_order_input(order: &[String]) -> Result<(), ReorderError> {
    if order.is_empty() {
        return Err(ReorderError::InvalidInput(
            "order must contain at least one slug".into(),
        ));
    }

    let mut seen = HashSet::with_capacity(order.len());
    for slug in order {
        if slug.trim().is_empty() {
            return Err(ReorderError::InvalidInput(
                "order must not contain blank slugs".into(),
            ));
        }
        if !seen.insert(slug.as_str()) {
            return Err(ReorderError::InvalidInput(format!(
                "slug '{slug}' appears more than once"
            )));
        }
    }
    Ok(())
}

/// Requested slugs absent from `existing`, in request order.
pub fn missing_slugs<'a, I>(order: &[String], existing: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let existing: HashSet<&str> = existing.into_iter().collect();
    order
        .iter()
        .filter(|slug| !existing.contains(slug.as_str()))
        .cloned()
        .collect()
}

/// Pair each slug with its zero-based position.
pub fn order_assignments(order: &[String]) -> impl Iterator<Item = (&str, SortOrder)> + '_ {
    order
        .iter()
        .zip(0..)
        .map(|(slug, position)| (slug.as_str(), position))
}
