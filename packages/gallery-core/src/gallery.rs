//! 元画像のアップロードと一覧

use std::sync::Arc;

use bytes::Bytes;
use futures::future::try_join_all;
use serde::Serialize;

use crate::errors::MediaError;
use crate::settings::GallerySettings;
use crate::storage::{ObjectStore, with_timeout};
use crate::transform::content_type_for_key;
use crate::validation::upload_key;

pub const NO_FILES_MESSAGE: &str = "No files were uploaded.";

/// アップロードされた 1 ファイル
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub body: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub thumbnail_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedImage {
    pub key: String,
    pub signed_url: String,
}

#[derive(Clone)]
pub struct Gallery {
    store: Arc<dyn ObjectStore>,
    settings: GallerySettings,
}

impl Gallery {
    pub fn new(store: Arc<dyn ObjectStore>, settings: GallerySettings) -> Self {
        Self { store, settings }
    }

    /// ファイルを `myuploads/{file_name}` に保存し、各ファイルの署名付き URL を返す
    ///
    /// 全ファイルを並行して保存し、1 つでも失敗したらリクエスト全体を失敗とする。
    /// 保存済みのファイルは巻き戻さない。ファイル名の検証は書き込み前にまとめて行う。
    pub async fn upload(&self, files: Vec<UploadFile>) -> Result<Vec<UploadedImage>, MediaError> {
        if files.is_empty() {
            return Err(MediaError::Validation(NO_FILES_MESSAGE.to_string()));
        }

        let keyed = files
            .into_iter()
            .map(|file| Ok((upload_key(&file.file_name)?, file.body)))
            .collect::<Result<Vec<_>, MediaError>>()?;

        let uploaded = try_join_all(
            keyed
                .into_iter()
                .map(|(key, body)| self.upload_one(key, body)),
        )
        .await?;

        tracing::info!(count = uploaded.len(), "files uploaded successfully");
        Ok(uploaded)
    }

    async fn upload_one(&self, key: String, body: Bytes) -> Result<UploadedImage, MediaError> {
        let timeout = self.settings.upstream_timeout;
        let size = body.len();

        with_timeout(timeout, self.store.put(&key, body, content_type_for_key(&key))).await?;
        tracing::debug!(key = %key, size, "object stored");

        let thumbnail_url =
            with_timeout(timeout, self.store.sign(&key, self.settings.signed_url_ttl)).await?;
        Ok(UploadedImage { thumbnail_url })
    }

    /// バケット内の全オブジェクトを署名付き URL 付きで返す
    pub async fn list(&self) -> Result<Vec<ListedImage>, MediaError> {
        let timeout = self.settings.upstream_timeout;
        let ttl = self.settings.signed_url_ttl;

        let keys = with_timeout(timeout, self.store.list(None)).await?;
        let images = try_join_all(keys.into_iter().map(|key| async move {
            let signed_url = with_timeout(timeout, self.store.sign(&key, ttl)).await?;
            Ok::<_, MediaError>(ListedImage { key, signed_url })
        }))
        .await?;

        Ok(images)
    }
}
