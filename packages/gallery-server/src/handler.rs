use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::AppState;
use gallery_core::{
    ListedImage, MediaError, StorageError, TransformError, UploadFile, UploadedImage,
    parse_dimensions,
};

/// 複数アップロードのフィールド名
const IMAGES_FIELD: &str = "images";
/// 単一アップロードのフィールド名
const FILE_FIELD: &str = "file";

const UPLOAD_FAILED: &str = "Failed to upload files";
const LIST_FAILED: &str = "Failed to list files";
const RESIZE_FAILED: &str = "Failed to resize image";
const IMAGE_NOT_FOUND: &str = "Image not found";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub images: Vec<UploadedImage>,
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// `POST /api/upload`
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    // multipart でないリクエストは「ファイルなし」と同じ扱い
    let files = match multipart {
        Ok(multipart) => read_files(multipart).await?,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "upload request is not multipart");
            Vec::new()
        }
    };

    let images = state
        .gallery
        .upload(files)
        .await
        .map_err(|e| AppError::from_media(e, UPLOAD_FAILED))?;

    Ok(Json(UploadResponse { images }))
}

/// `images` / `file` フィールドのうちファイル名付きのパートだけを集める
///
/// ファイル未選択のままブラウザから送信されたフォームは `filename=""` の
/// パートを含むため、空のファイル名も「ファイルなし」として読み飛ばす
async fn read_files(mut multipart: Multipart) -> Result<Vec<UploadFile>, AppError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(AppError::from_multipart)? {
        if !matches!(field.name(), Some(IMAGES_FIELD | FILE_FIELD)) {
            continue;
        }
        let Some(file_name) = field
            .file_name()
            .filter(|name| !name.trim().is_empty())
            .map(str::to_string)
        else {
            continue;
        };

        let body = field.bytes().await.map_err(AppError::from_multipart)?;
        tracing::debug!(file_name = %file_name, size = body.len(), "received file part");
        files.push(UploadFile { file_name, body });
    }

    Ok(files)
}

/// `GET /api/images`
pub async fn list_images(
    State(state): State<AppState>,
) -> Result<Json<Vec<ListedImage>>, AppError> {
    let images = state
        .gallery
        .list()
        .await
        .map_err(|e| AppError::from_media(e, LIST_FAILED))?;

    Ok(Json(images))
}

/// `GET /api/images/{width}x{height}/{*key}`
///
/// 派生画像の署名付き URL へリダイレクトする
pub async fn resize(
    State(state): State<AppState>,
    Path((size, key)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let dims = parse_dimensions(&size).map_err(|e| AppError::from_media(e, RESIZE_FAILED))?;

    let url = state
        .cache
        .resolve(&key, dims.width, dims.height)
        .await
        .map_err(|e| AppError::from_media(e, RESIZE_FAILED))?;

    Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
}

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    PayloadTooLarge(String),
    /// 上流（ストレージ・変換）の障害。詳細はログにのみ残し、定型文を返す
    Upstream(&'static str),
}

impl AppError {
    fn from_media(err: MediaError, failure: &'static str) -> Self {
        match err {
            MediaError::Validation(msg) => {
                tracing::warn!(error = %msg, "validation error");
                AppError::BadRequest(msg)
            }
            MediaError::Storage(storage_err) => Self::from_storage(storage_err, failure),
            MediaError::Transform(transform_err) => Self::from_transform(transform_err, failure),
        }
    }

    fn from_storage(err: StorageError, failure: &'static str) -> Self {
        match err {
            StorageError::NotFound { key } => {
                tracing::warn!(key = %key, "object not found");
                AppError::NotFound(IMAGE_NOT_FOUND.to_string())
            }
            StorageError::Forbidden => {
                tracing::error!("access denied by object store (check credentials)");
                AppError::Upstream(failure)
            }
            StorageError::Timeout => {
                tracing::error!("object store request timed out");
                AppError::Upstream(failure)
            }
            StorageError::Internal(msg) => {
                tracing::error!(error = %msg, "storage error");
                AppError::Upstream(failure)
            }
        }
    }

    fn from_transform(err: TransformError, failure: &'static str) -> Self {
        match err {
            TransformError::InvalidParams(msg) => {
                tracing::warn!(error = %msg, "invalid transform parameters");
                AppError::BadRequest(msg)
            }
            TransformError::ResolutionTooLarge { width, height } => {
                tracing::error!(
                    width = %width,
                    height = %height,
                    "source image resolution too large"
                );
                AppError::Upstream(failure)
            }
            TransformError::ProcessingFailed(msg) => {
                tracing::error!(error = %msg, "image processing failed");
                AppError::Upstream(failure)
            }
            TransformError::Timeout => {
                tracing::error!("image processing timed out");
                AppError::Upstream(failure)
            }
        }
    }

    fn from_multipart(err: MultipartError) -> Self {
        tracing::warn!(error = %err, "malformed multipart request");
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge("Upload is too large".to_string())
        } else {
            AppError::BadRequest("Malformed multipart request".to_string())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            AppError::Upstream(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.to_string()),
        };

        (status, message).into_response()
    }
}
