//! Entity models and DTOs.

pub mod project;
