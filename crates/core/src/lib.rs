//! Domain types and pure logic for the folio portfolio service.
//!
//! Nothing in this crate touches storage or the network: it holds the
//! section model, slug rules, reorder input validation and the shared
//! error types that the `folio-db` and `folio-api` crates build on.

pub mod error;
pub mod media;
pub mod reorder;
pub mod section;
pub mod slug;
pub mod types;
