//! Authentication primitives.
//!
//! - [`password`] -- Argon2id hashing and verification of the admin password.
//! - [`jwt`] -- admin access-token generation and validation.

pub mod jwt;
pub mod password;
