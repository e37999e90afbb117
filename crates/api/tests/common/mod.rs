#![allow(dead_code)]

use std::sync::{Arc, LazyLock, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use folio_api::auth::jwt::{generate_admin_token, JwtConfig};
use folio_api::auth::password::hash_password;
use folio_api::config::{AdminConfig, ServerConfig};
use folio_api::media::{ImageUpload, MediaError, MediaHost, UploadedImage};
use folio_api::router::build_app_router;
use folio_api::state::AppState;
use folio_db::models::project::ProjectInput;
use folio_db::{MemoryProjectStore, ProjectStore};

/// Plaintext admin password accepted by [`test_config`].
pub const TEST_PASSWORD: &str = "correct horse battery staple";

const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

static TEST_PASSWORD_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password(TEST_PASSWORD).expect("hashing should succeed"));

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 10 * 1024 * 1024,
        database_url: None,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            expiry_days: 7,
        },
        admin: AdminConfig {
            password_hash: TEST_PASSWORD_HASH.clone(),
        },
        cloudinary: None,
    }
}

/// A valid admin token for [`test_config`].
pub fn admin_token() -> String {
    generate_admin_token(&test_config().jwt).expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// Full application router over `store`, with uploads disabled.
pub fn build_test_app(store: Arc<dyn ProjectStore>) -> Router {
    build_test_app_with(test_config(), store, None)
}

/// Full application router with an explicit config and media host.
pub fn build_test_app_with(
    config: ServerConfig,
    store: Arc<dyn ProjectStore>,
    media: Option<Arc<dyn MediaHost>>,
) -> Router {
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
        media,
    };
    build_app_router(state, &config)
}

/// A fresh in-memory store.
pub fn memory_store() -> Arc<MemoryProjectStore> {
    Arc::new(MemoryProjectStore::new())
}

/// Insert projects straight into the store, in the given order.
pub async fn seed(store: &dyn ProjectStore, slugs: &[&str]) {
    for slug in slugs {
        let input: ProjectInput = serde_json::from_value(serde_json::json!({
            "slug": slug,
            "name": slug.to_uppercase(),
        }))
        .expect("seed input should deserialize");
        let (draft, _) = input.into_new_draft().expect("seed input should validate");
        store.insert(&draft).await.expect("seed insert should succeed");
    }
}

/// Current `(slug, order)` pairs in listing order.
pub async fn orders(store: &dyn ProjectStore) -> Vec<(String, i32)> {
    store
        .list_all()
        .await
        .expect("listing should succeed")
        .into_iter()
        .map(|p| (p.slug, p.order))
        .collect()
}

// ---------------------------------------------------------------------------
// Fake media host
// ---------------------------------------------------------------------------

/// Records calls instead of talking to a real media host.
#[derive(Default)]
pub struct FakeMediaHost {
    pub uploads: Mutex<Vec<ImageUpload>>,
    pub destroyed: Mutex<Vec<String>>,
}

#[async_trait]
impl MediaHost for FakeMediaHost {
    async fn upload(&self, image: ImageUpload) -> Result<UploadedImage, MediaError> {
        let stem = image
            .file_name
            .rsplit_once('.')
            .map_or(image.file_name.as_str(), |(stem, _)| stem)
            .to_string();
        self.uploads.lock().unwrap().push(image);
        Ok(UploadedImage {
            url: format!("https://res.cloudinary.com/demo/image/upload/v1/portfolio/{stem}.jpg"),
            public_id: format!("portfolio/{stem}"),
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<String, MediaError> {
        self.destroyed.lock().unwrap().push(public_id.to_string());
        Ok("ok".to_string())
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

fn json_request(method: Method, uri: &str, body: serde_json::Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, body, None)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::POST, uri, body, Some(token))).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, body, None)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, body, Some(token))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::DELETE, uri, body, Some(token))).await
}

/// Send a raw body with an explicit content type.
pub async fn send_raw(
    app: Router,
    method: Method,
    uri: &str,
    content_type: &str,
    body: Vec<u8>,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", content_type);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    send(app, builder.body(Body::from(body)).unwrap()).await
}

/// Multipart boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "folio-test-boundary";

/// A `multipart/form-data` body holding one file field.
pub fn multipart_body(field: &str, file_name: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Content type header value matching [`multipart_body`].
pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
