//! オブジェクトストレージのポートと実装
//!
//! キャッシュやアップロード処理は [`ObjectStore`] トレイト越しにのみ
//! ストレージへアクセスする。本番は S3、テストとローカル実行はインメモリ実装を使う。

pub mod client;
pub mod memory;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

pub use crate::errors::StorageError;
pub use client::S3ObjectStore;
pub use memory::MemoryObjectStore;

/// オブジェクトストレージ
///
/// read-after-write 一貫性を前提とする（キャッシュ判定の正しさに必要）。
/// 同一キーへの並行書き込みは last-writer-wins でよい。
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// オブジェクトの存在確認（本体は転送しない）
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;

    /// オブジェクト本体を取得する。存在しなければ `StorageError::NotFound`
    async fn get(&self, key: &str) -> Result<Bytes, StorageError>;

    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), StorageError>;

    /// プレフィックス配下のキーを全件列挙する（ページングは実装側で処理）
    async fn list(&self, prefix: Option<&str>) -> Result<Vec<String>, StorageError>;

    /// 期限付きの読み取り用 URL を発行する
    async fn sign(&self, key: &str, ttl: Duration) -> Result<String, StorageError>;
}

/// ストレージ呼び出しにタイムアウトを課す
pub async fn with_timeout<T, F>(timeout: Duration, fut: F) -> Result<T, StorageError>
where
    F: Future<Output = Result<T, StorageError>>,
{
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| StorageError::Timeout)?
}
