use std::time::Duration;

use crate::constants::{DEFAULT_SIGNED_URL_TTL_SECS, DEFAULT_UPSTREAM_TIMEOUT_SECS};

/// キャッシュとアップロード処理で共有する実行時設定
///
/// 起動時に一度だけ組み立てて各コンポーネントに渡す
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GallerySettings {
    /// 署名付き URL の有効期限
    pub signed_url_ttl: Duration,
    /// ストレージ呼び出し・変換処理 1 回あたりのタイムアウト
    pub upstream_timeout: Duration,
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self {
            signed_url_ttl: Duration::from_secs(DEFAULT_SIGNED_URL_TTL_SECS),
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        }
    }
}
