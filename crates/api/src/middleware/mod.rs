//! Authorization extractors.
//!
//! - [`auth::AdminUser`] -- Requires a valid admin JWT Bearer token.

pub mod auth;
