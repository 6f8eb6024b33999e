//! 派生画像キャッシュ
//!
//! `(幅, 高さ, 元キー)` から決定的に導かれるキーに派生画像を保存し、
//! 2 回目以降はストレージ上のオブジェクトをそのまま再利用する。
//! 索引やロックは持たず、ストレージを唯一の真実とする。
//!
//! 同じ組み合わせへの並行リクエストは両方が変換・保存することがあるが、
//! 変換は決定的なので同じバイト列が同じキーに書かれるだけで済む。

use std::sync::Arc;

use crate::constants::{DERIVED_PREFIX, MAX_KEY_LENGTH};
use crate::errors::{MediaError, TransformError};
use crate::settings::GallerySettings;
use crate::storage::{ObjectStore, with_timeout};
use crate::transform::{Dimensions, OutputFormat, Transcoder};
use crate::validation::{validate_dimensions, validate_key};

/// 派生画像のキー `derived/{width}x{height}/{original_key}`
pub fn derived_key(dims: Dimensions, original_key: &str) -> String {
    format!("{DERIVED_PREFIX}/{dims}/{original_key}")
}

#[derive(Clone)]
pub struct DerivedAssetCache {
    store: Arc<dyn ObjectStore>,
    transcoder: Arc<dyn Transcoder>,
    settings: GallerySettings,
}

impl DerivedAssetCache {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        transcoder: Arc<dyn Transcoder>,
        settings: GallerySettings,
    ) -> Self {
        Self {
            store,
            transcoder,
            settings,
        }
    }

    /// 指定寸法の派生画像への署名付き URL を返す
    ///
    /// 派生画像がなければ元画像から生成して保存する。
    /// 元画像がなければ `StorageError::NotFound` で失敗し、何も書き込まない。
    pub async fn resolve(
        &self,
        original_key: &str,
        width: u32,
        height: u32,
    ) -> Result<String, MediaError> {
        validate_key(original_key)?;
        validate_dimensions(width, height)?;

        let dims = Dimensions::new(width, height);
        let key = derived_key(dims, original_key);
        // 派生キーは接頭辞の分だけ元キーより長い
        if key.len() > MAX_KEY_LENGTH {
            return Err(MediaError::Validation(format!(
                "key is too long for derived assets (max {MAX_KEY_LENGTH})"
            )));
        }
        let timeout = self.settings.upstream_timeout;

        // NotFound 以外のストレージエラーはキャッシュミス扱いにせず伝播する
        if with_timeout(timeout, self.store.exists(&key)).await? {
            tracing::debug!(key = %key, "derived asset cache hit");
        } else {
            tracing::info!(
                key = %key,
                original = %original_key,
                width = dims.width,
                height = dims.height,
                "derived asset cache miss, generating"
            );
            self.generate(original_key, dims, &key).await?;
        }

        let ttl = self.settings.signed_url_ttl;
        let url = with_timeout(timeout, self.store.sign(&key, ttl)).await?;
        Ok(url)
    }

    async fn generate(
        &self,
        original_key: &str,
        dims: Dimensions,
        key: &str,
    ) -> Result<(), MediaError> {
        let timeout = self.settings.upstream_timeout;
        let original = with_timeout(timeout, self.store.get(original_key)).await?;

        let format = OutputFormat::from_key(original_key);
        let transcoder = Arc::clone(&self.transcoder);
        let task = tokio::task::spawn_blocking(move || transcoder.resize(&original, dims, format));

        let output = match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result?,
            Ok(Err(e)) => {
                return Err(TransformError::ProcessingFailed(format!(
                    "transcode task failed: {e}"
                ))
                .into());
            }
            Err(_) => return Err(TransformError::Timeout.into()),
        };

        with_timeout(timeout, self.store.put(key, output, format.content_type())).await?;
        tracing::info!(key = %key, "derived asset stored");

        Ok(())
    }
}
