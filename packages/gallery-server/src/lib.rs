pub mod config;
pub mod handler;
pub mod storage;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use gallery_core::{DerivedAssetCache, Gallery, GallerySettings, ObjectStore, Transcoder};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub gallery: Gallery,
    pub cache: DerivedAssetCache,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        transcoder: Arc<dyn Transcoder>,
        settings: GallerySettings,
    ) -> Self {
        Self {
            gallery: Gallery::new(Arc::clone(&store), settings),
            cache: DerivedAssetCache::new(store, transcoder, settings),
        }
    }
}

/// ルーターを作成する
///
/// - `GET /health`
/// - `POST /api/upload`
/// - `GET /api/images`
/// - `GET /api/images/{width}x{height}/{*key}`
pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    let api = Router::new()
        .route(
            "/upload",
            post(handler::upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/images", get(handler::list_images))
        .route("/images/{size}/{*key}", get(handler::resize));

    // ブラウザから直接アップロードするため CORS は全許可
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handler::health))
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
