/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Presentation position of a project in the public listing.
pub type SortOrder = i32;
