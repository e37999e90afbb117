//! Request handlers.
//!
//! Each submodule provides the async handler functions for one resource.
//! Handlers delegate to the [`ProjectStore`](folio_db::ProjectStore), the
//! reorder coordinator or the media host, and map errors via
//! [`AppError`](crate::error::AppError).

pub mod auth;
pub mod project;
pub mod upload;
