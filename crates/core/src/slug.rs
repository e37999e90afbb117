//! Slug derivation and validation.
//!
//! A slug is the immutable, URL-safe identity of a project. When the admin
//! does not supply one it is derived from the project name.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

static DISALLOWED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9-]").expect("valid regex"));

static CANONICAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("valid regex"));

/// Maximum accepted slug length in bytes.
pub const MAX_SLUG_LEN: usize = 128;

/// Path segments under `/projects` that are routes of their own.
pub const RESERVED_SLUGS: &[&str] = &["reorder"];

/// Derive a slug from a display name.
///
/// Lowercases, turns every whitespace run into a single `-`, then drops any
/// character outside `[a-z0-9-]`. The result may be empty (e.g. a name made
/// only of punctuation); [`validate_slug`] rejects that case.
///
/// ```
/// use folio_core::slug::derive_slug;
///
/// assert_eq!(derive_slug("Blue Hour  Films"), "blue-hour-films");
/// assert_eq!(derive_slug("Café & Co."), "caf--co");
/// ```
pub fn derive_slug(name: &str) -> String {
    let lowered = name.to_lowercase();
    let dashed = WHITESPACE_RE.replace_all(&lowered, "-");
    DISALLOWED_RE.replace_all(&dashed, "").into_owned()
}

/// Check that a slug is non-empty, canonical, not absurdly long and not
/// one of [`RESERVED_SLUGS`].
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation("Slug must not be empty".into()));
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(CoreError::Validation(format!(
            "Slug must be at most {MAX_SLUG_LEN} characters"
        )));
    }
    if !CANONICAL_RE.is_match(slug) {
        return Err(CoreError::Validation(format!(
            "Slug '{slug}' may only contain lowercase letters, digits and '-'"
        )));
    }
    if RESERVED_SLUGS.contains(&slug) {
        return Err(CoreError::Validation(format!("Slug '{slug}' is reserved")));
    }
    Ok(())
}

/// Pick the slug for a new project: the explicit one when present and
/// non-blank, otherwise one derived from `name`. The result is validated.
pub fn resolve_slug(explicit: Option<&str>, name: &str) -> Result<String, CoreError> {
    let slug = match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.to_string(),
        None => derive_slug(name),
    };
    validate_slug(&slug)?;
    Ok(slug)
}
