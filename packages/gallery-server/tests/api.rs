//! ルーター全体をプロセス内で駆動する統合テスト

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use bytes::Bytes;
use gallery_core::{
    GallerySettings, ImageTranscoder, MemoryObjectStore, ObjectStore, OutputFormat, StorageError,
    encode_image,
};
use gallery_server::{AppState, create_router};
use http_body_util::BodyExt;
use image::DynamicImage;
use serde_json::Value;
use tower::ServiceExt;

const BOUNDARY: &str = "gallery-test-boundary";
const MAX_UPLOAD_BYTES: usize = 1024 * 1024;

/// すべての操作が失敗するストレージ
struct FailingStore;

#[async_trait]
impl ObjectStore for FailingStore {
    async fn exists(&self, _key: &str) -> Result<bool, StorageError> {
        Err(StorageError::Internal("S3 Error".to_string()))
    }

    async fn get(&self, _key: &str) -> Result<Bytes, StorageError> {
        Err(StorageError::Internal("S3 Error".to_string()))
    }

    async fn put(&self, _key: &str, _body: Bytes, _ct: &str) -> Result<(), StorageError> {
        Err(StorageError::Internal("S3 Error".to_string()))
    }

    async fn list(&self, _prefix: Option<&str>) -> Result<Vec<String>, StorageError> {
        Err(StorageError::Internal("S3 Error".to_string()))
    }

    async fn sign(&self, _key: &str, _ttl: Duration) -> Result<String, StorageError> {
        Err(StorageError::Internal("S3 Error".to_string()))
    }
}

/// 特定のキーへの put だけが失敗するストレージ
struct PartiallyFailingStore {
    inner: MemoryObjectStore,
    failing_key: &'static str,
}

#[async_trait]
impl ObjectStore for PartiallyFailingStore {
    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        self.inner.exists(key).await
    }

    async fn get(&self, key: &str) -> Result<Bytes, StorageError> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, body: Bytes, ct: &str) -> Result<(), StorageError> {
        if key == self.failing_key {
            return Err(StorageError::Internal("S3 Error".to_string()));
        }
        self.inner.put(key, body, ct).await
    }

    async fn list(&self, prefix: Option<&str>) -> Result<Vec<String>, StorageError> {
        self.inner.list(prefix).await
    }

    async fn sign(&self, key: &str, ttl: Duration) -> Result<String, StorageError> {
        self.inner.sign(key, ttl).await
    }
}

fn app(store: Arc<dyn ObjectStore>) -> Router {
    app_with_limit(store, MAX_UPLOAD_BYTES)
}

fn app_with_limit(store: Arc<dyn ObjectStore>, max_upload_bytes: usize) -> Router {
    let state = AppState::new(
        store,
        Arc::new(ImageTranscoder::default()),
        GallerySettings::default(),
    );
    create_router(state, max_upload_bytes)
}

/// (フィールド名, ファイル名, 内容) からマルチパートボディを組み立てる
fn multipart_body(parts: &[(&str, Option<&str>, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, file_name, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match file_name {
            Some(file_name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(data.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

fn location(response: &axum::response::Response) -> String {
    response.headers()[header::LOCATION].to_str().unwrap().to_string()
}

fn sample_png() -> Vec<u8> {
    encode_image(&DynamicImage::new_rgb8(64, 48), OutputFormat::Png, 80).unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = app(Arc::new(MemoryObjectStore::new()))
        .oneshot(get("/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_upload_then_list() {
    let store = Arc::new(MemoryObjectStore::new());
    let app = app(store.clone());

    let response = app
        .clone()
        .oneshot(upload_request(&[
            ("images", Some("test-file.jpg"), "test-file-content"),
            ("images", Some("other.png"), "more-content"),
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let images = json["images"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(
        images[0]["thumbnailUrl"],
        "memory://myuploads/test-file.jpg?expires_in=3600"
    );
    assert_eq!(
        images[1]["thumbnailUrl"],
        "memory://myuploads/other.png?expires_in=3600"
    );
    assert_eq!(store.content_type("myuploads/other.png").as_deref(), Some("image/png"));

    let response = app.oneshot(get("/api/images")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let keys: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["myuploads/other.png", "myuploads/test-file.jpg"]);
    assert_eq!(
        json[0]["signedUrl"],
        "memory://myuploads/other.png?expires_in=3600"
    );
}

#[tokio::test]
async fn test_single_file_field() {
    let store = Arc::new(MemoryObjectStore::new());

    let response = app(store.clone())
        .oneshot(upload_request(&[("file", Some("single.jpg"), "x")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(store.exists("myuploads/single.jpg").await.unwrap());
}

#[tokio::test]
async fn test_upload_without_body() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/upload")
        .body(Body::empty())
        .unwrap();

    let response = app(Arc::new(MemoryObjectStore::new()))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "No files were uploaded.");
}

#[tokio::test]
async fn test_upload_without_file_parts() {
    let store = Arc::new(MemoryObjectStore::new());

    let response = app(store.clone())
        .oneshot(upload_request(&[
            ("caption", None, "hello"),
            ("other", Some("ignored.jpg"), "data"),
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "No files were uploaded.");
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_upload_store_failure() {
    let response = app(Arc::new(FailingStore))
        .oneshot(upload_request(&[("images", Some("test-file.jpg"), "content")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Failed to upload files");
}

#[tokio::test]
async fn test_upload_fails_when_any_file_fails() {
    let store = Arc::new(PartiallyFailingStore {
        inner: MemoryObjectStore::new(),
        failing_key: "myuploads/second.jpg",
    });

    let response = app(store.clone())
        .oneshot(upload_request(&[
            ("images", Some("first.jpg"), "one"),
            ("images", Some("second.jpg"), "two"),
            ("images", Some("third.jpg"), "three"),
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Failed to upload files");
    assert!(!store.inner.exists("myuploads/second.jpg").await.unwrap());
}

#[tokio::test]
async fn test_upload_with_empty_file_name() {
    // ファイル未選択のブラウザフォームは filename="" の空パートを送る
    let store = Arc::new(MemoryObjectStore::new());

    let response = app(store.clone())
        .oneshot(upload_request(&[("images", Some(""), "")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "No files were uploaded.");
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_upload_too_large() {
    let store = Arc::new(MemoryObjectStore::new());
    let big = "x".repeat(4096);

    let response = app_with_limit(store.clone(), 512)
        .oneshot(upload_request(&[("images", Some("big.jpg"), big.as_str())]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_list_store_failure() {
    let response = app(Arc::new(FailingStore))
        .oneshot(get("/api/images"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Failed to list files");
}

#[tokio::test]
async fn test_resize_redirects_to_derived_asset() {
    let store = Arc::new(MemoryObjectStore::new());
    store
        .put("myuploads/cat.png", Bytes::from(sample_png()), "image/png")
        .await
        .unwrap();
    let app = app(store.clone());

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(get("/api/images/100x200/myuploads/cat.png"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            location(&response),
            "memory://derived/100x200/myuploads/cat.png?expires_in=3600"
        );
    }

    assert_eq!(
        store.content_type("derived/100x200/myuploads/cat.png").as_deref(),
        Some("image/png")
    );
    // 元画像 1 回 + 派生画像 1 回
    assert_eq!(store.put_count(), 2);
}

#[tokio::test]
async fn test_resize_missing_original() {
    let store = Arc::new(MemoryObjectStore::new());

    let response = app(store.clone())
        .oneshot(get("/api/images/100x100/myuploads/missing.jpg"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "Image not found");
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_resize_rejects_bad_dimensions() {
    for uri in [
        "/api/images/0x100/a.jpg",
        "/api/images/100x0/a.jpg",
        "/api/images/5000x100/a.jpg",
        "/api/images/abcx100/a.jpg",
        "/api/images/100/a.jpg",
    ] {
        // 寸法検証はストレージに触れる前に行われる
        let response = app(Arc::new(FailingStore)).oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[tokio::test]
async fn test_resize_store_failure() {
    let response = app(Arc::new(FailingStore))
        .oneshot(get("/api/images/10x10/a.jpg"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Failed to resize image");
}

#[tokio::test]
async fn test_resize_undecodable_original() {
    let store = Arc::new(MemoryObjectStore::new());
    store
        .put("notes.jpg", Bytes::from_static(b"plain text"), "image/jpeg")
        .await
        .unwrap();

    let response = app(store.clone())
        .oneshot(get("/api/images/10x10/notes.jpg"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Failed to resize image");
    assert!(!store.exists("derived/10x10/notes.jpg").await.unwrap());
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://example.com")
        .body(Body::empty())
        .unwrap();

    let response = app(Arc::new(MemoryObjectStore::new()))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
