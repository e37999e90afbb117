//! HTTP-level integration tests for the image upload proxy.

mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use axum::Router;
use common::{
    body_json, delete_json_auth, multipart_body, multipart_content_type, send_raw, FakeMediaHost,
};
use folio_api::media::MediaHost;
use serde_json::json;

const UPLOAD: &str = "/api/upload/image";

fn app_with_media(max_upload_bytes: usize) -> (Router, Arc<FakeMediaHost>) {
    let media = Arc::new(FakeMediaHost::default());
    let mut config = common::test_config();
    config.max_upload_bytes = max_upload_bytes;
    let app = common::build_test_app_with(
        config,
        common::memory_store(),
        Some(media.clone() as Arc<dyn MediaHost>),
    );
    (app, media)
}

async fn upload(app: Router, body: Vec<u8>, token: Option<&str>) -> axum::http::Response<axum::body::Body> {
    send_raw(app, Method::POST, UPLOAD, &multipart_content_type(), body, token).await
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_forwards_image_and_returns_url() {
    let (app, media) = app_with_media(1024 * 1024);
    let body = multipart_body("image", "cover.png", "image/png", b"\x89PNG fake bytes");

    let response = upload(app, body, Some(&common::admin_token())).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Image uploaded successfully");
    assert_eq!(
        json["url"],
        "https://res.cloudinary.com/demo/image/upload/v1/portfolio/cover.jpg"
    );
    assert_eq!(json["publicId"], "portfolio/cover");

    let uploads = media.uploads.lock().unwrap();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].file_name, "cover.png");
    assert_eq!(uploads[0].content_type, "image/png");
    assert_eq!(uploads[0].bytes, b"\x89PNG fake bytes".to_vec());
}

#[tokio::test]
async fn upload_requires_admin() {
    let (app, media) = app_with_media(1024 * 1024);
    let body = multipart_body("image", "cover.png", "image/png", b"png");

    let response = upload(app, body, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(media.uploads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn upload_rejects_non_images_and_missing_files() {
    let (app, media) = app_with_media(1024 * 1024);
    let token = common::admin_token();

    let body = multipart_body("image", "notes.txt", "text/plain", b"hello");
    let response = upload(app.clone(), body, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Only image files are allowed");

    let body = multipart_body("attachment", "cover.png", "image/png", b"png");
    let response = upload(app, body, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "No image file provided");

    assert!(media.uploads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let (app, media) = app_with_media(1024);
    let body = multipart_body("image", "big.png", "image/png", &vec![0u8; 4096]);

    let response = upload(app, body, Some(&common::admin_token())).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(media.uploads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn upload_without_media_host_is_503() {
    let app = common::build_test_app(common::memory_store());
    let body = multipart_body("image", "cover.png", "image/png", b"png");

    let response = upload(app, body, Some(&common::admin_token())).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "MEDIA_DISABLED");
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_reduces_urls_to_public_ids() {
    let (app, media) = app_with_media(1024 * 1024);
    let token = common::admin_token();

    let response = delete_json_auth(
        app.clone(),
        UPLOAD,
        json!({"filename": "https://res.cloudinary.com/demo/image/upload/v1712/portfolio/cover.jpg"}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["result"], "ok");
    assert_eq!(json["message"], "Image deleted successfully");

    let response = delete_json_auth(app, UPLOAD, json!({"filename": "portfolio/other"}), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(
        *media.destroyed.lock().unwrap(),
        vec!["portfolio/cover".to_string(), "portfolio/other".to_string()]
    );
}

#[tokio::test]
async fn delete_requires_filename() {
    let (app, media) = app_with_media(1024 * 1024);

    let response = delete_json_auth(app, UPLOAD, json!({}), &common::admin_token()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Filename is required");
    assert!(media.destroyed.lock().unwrap().is_empty());
}
