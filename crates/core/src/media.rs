//! Helpers for media references held by project records.
//!
//! Image bytes live on an external media host; records only carry URLs or
//! bare filenames. Videos are Vimeo embeds referenced by numeric id.

/// Path prefix for images referenced by bare filename.
pub const UPLOADS_PREFIX: &str = "/images/uploads/";

/// Resolve an image reference to a URL the site can load.
///
/// References containing `/` are already paths or absolute URLs and are
/// returned unchanged; bare filenames resolve under [`UPLOADS_PREFIX`].
///
/// ```
/// use folio_core::media::resolve_image_url;
///
/// assert_eq!(resolve_image_url("cover.jpg"), "/images/uploads/cover.jpg");
/// assert_eq!(resolve_image_url("https://cdn.test/a.jpg"), "https://cdn.test/a.jpg");
/// ```
pub fn resolve_image_url(reference: &str) -> String {
    if reference.contains('/') {
        reference.to_string()
    } else {
        format!("{UPLOADS_PREFIX}{reference}")
    }
}

/// Keep only the digits of a user-entered Vimeo id (`" 12 34 "` -> `"1234"`).
pub fn vimeo_id_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Extract a media-host public id from a delivery URL.
///
/// Delivery URLs look like
/// `https://res.cloudinary.com/<cloud>/image/upload/v1712/<folder>/<name>.jpg`;
/// the public id is everything after the version segment with the file
/// extension removed (`<folder>/<name>`). Anything that is not such a URL
/// is assumed to already be a public id and returned trimmed.
pub fn public_id_from_reference(reference: &str) -> String {
    let reference = reference.trim();
    let Some((_, after_upload)) = reference.split_once("/upload/") else {
        return reference.to_string();
    };

    let mut segments: Vec<&str> = after_upload
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();
    if segments
        .first()
        .is_some_and(|s| s.len() > 1 && s.starts_with('v') && s[1..].chars().all(|c| c.is_ascii_digit()))
    {
        segments.remove(0);
    }

    let joined = segments.join("/");
    let without_query = joined.split(['?', '#']).next().unwrap_or_default();
    match without_query.rsplit_once('.') {
        Some((stem, ext)) if !ext.contains('/') => stem.to_string(),
        _ => without_query.to_string(),
    }
}
