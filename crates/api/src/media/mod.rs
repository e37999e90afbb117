//! External image hosting.
//!
//! Image bytes never touch the project store: the upload routes hand them
//! to a [`MediaHost`] and store only the returned URL. [`cloudinary`] is the
//! production host; tests substitute their own implementation.

pub mod cloudinary;

use async_trait::async_trait;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// An image received from the admin, ready to forward.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Where a hosted image can be fetched from and how to delete it later.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub url: String,
    pub public_id: String,
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The media host answered with a non-2xx status.
    #[error("Media host returned HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// The media host answered 2xx but the body was not what we expect.
    #[error("Unexpected media host response: {0}")]
    UnexpectedResponse(String),
}

// ---------------------------------------------------------------------------
// MediaHost
// ---------------------------------------------------------------------------

/// A remote service that stores images on our behalf.
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Store an image and return its public URL.
    async fn upload(&self, image: ImageUpload) -> Result<UploadedImage, MediaError>;

    /// Delete a stored image by public id, returning the host's result
    /// string (`"ok"`, `"not found"`).
    async fn destroy(&self, public_id: &str) -> Result<String, MediaError>;
}
