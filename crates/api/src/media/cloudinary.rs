//! Cloudinary-backed [`MediaHost`].
//!
//! Uploads and deletions use Cloudinary's signed REST API: every request
//! carries the API key, a Unix timestamp and a SHA-256 signature over the
//! sorted request parameters. The account must be configured for SHA-256
//! signatures.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::{ImageUpload, MediaError, MediaHost, UploadedImage};

/// Default API root; the cloud name and resource path are appended.
pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Folder uploads land in when `CLOUDINARY_FOLDER` is unset.
const DEFAULT_FOLDER: &str = "portfolio";

/// HTTP request timeout for a single Cloudinary call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("folder", &self.folder)
            .finish()
    }
}

impl CloudinaryConfig {
    /// Load Cloudinary credentials from the environment.
    ///
    /// | Env Var                 | Required | Default     |
    /// |-------------------------|----------|-------------|
    /// | `CLOUDINARY_CLOUD_NAME` | yes*     | --          |
    /// | `CLOUDINARY_API_KEY`    | yes*     | --          |
    /// | `CLOUDINARY_API_SECRET` | yes*     | --          |
    /// | `CLOUDINARY_FOLDER`     | no       | `portfolio` |
    ///
    /// \* Returns `None` unless all three credentials are set, which
    /// disables the upload routes.
    pub fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let (cloud_name, api_key, api_secret) = match (
            var("CLOUDINARY_CLOUD_NAME"),
            var("CLOUDINARY_API_KEY"),
            var("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => {
                (cloud_name, api_key, api_secret)
            }
            (None, None, None) => return None,
            _ => {
                tracing::warn!("Cloudinary is partially configured; image uploads are disabled");
                return None;
            }
        };

        Some(Self {
            cloud_name,
            api_key,
            api_secret,
            folder: var("CLOUDINARY_FOLDER").unwrap_or_else(|| DEFAULT_FOLDER.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

/// Cloudinary request signature: SHA-256 hex of `k1=v1&k2=v2...` (keys
/// sorted) immediately followed by the API secret.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    format!("{:x}", Sha256::digest(format!("{to_sign}{api_secret}")))
}

// ---------------------------------------------------------------------------
// CloudinaryHost
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

pub struct CloudinaryHost {
    client: reqwest::Client,
    config: CloudinaryConfig,
    api_base: String,
}

impl CloudinaryHost {
    /// Create a host with a pre-configured HTTP client.
    pub fn new(config: CloudinaryConfig) -> Self {
        Self::with_api_base(config, DEFAULT_API_BASE)
    }

    /// Create a host that talks to a different API root.
    pub fn with_api_base(config: CloudinaryConfig, api_base: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            config,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/{}/image/{action}", self.api_base, self.config.cloud_name)
    }

    /// Signed fields shared by every request, with `params` folded in.
    fn signed_form(&self, params: &[(&str, &str)]) -> Form {
        let timestamp = chrono::Utc::now().timestamp().to_string();

        let mut to_sign = params.to_vec();
        to_sign.push(("timestamp", &timestamp));
        let signature = sign_params(&to_sign, &self.config.api_secret);

        let mut form = Form::new()
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp.clone())
            .text("signature", signature);
        for (key, value) in params {
            form = form.text(key.to_string(), value.to_string());
        }
        form
    }

    /// Send a form and turn a non-2xx answer into [`MediaError::HttpStatus`].
    async fn send(&self, url: String, form: Form) -> Result<reqwest::Response, MediaError> {
        let response = self.client.post(url).multipart(form).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        Err(MediaError::HttpStatus {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl MediaHost for CloudinaryHost {
    async fn upload(&self, image: ImageUpload) -> Result<UploadedImage, MediaError> {
        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)?;
        let form = self
            .signed_form(&[("folder", self.config.folder.as_str())])
            .part("file", part);

        let uploaded: UploadResponse = self
            .send(self.endpoint("upload"), form)
            .await?
            .json()
            .await
            .map_err(|e| MediaError::UnexpectedResponse(e.to_string()))?;

        tracing::info!(public_id = %uploaded.public_id, "Image uploaded to Cloudinary");
        Ok(UploadedImage {
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<String, MediaError> {
        let form = self.signed_form(&[("public_id", public_id)]);

        let destroyed: DestroyResponse = self
            .send(self.endpoint("destroy"), form)
            .await?
            .json()
            .await
            .map_err(|e| MediaError::UnexpectedResponse(e.to_string()))?;

        tracing::info!(public_id, result = %destroyed.result, "Image destroyed on Cloudinary");
        Ok(destroyed.result)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
