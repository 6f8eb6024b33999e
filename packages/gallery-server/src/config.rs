//! 環境変数からの設定読み込み
//!
//! 必須項目が欠けていればリクエストを受ける前に起動を失敗させる。

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use gallery_core::GallerySettings;
use gallery_core::constants::{DEFAULT_SIGNED_URL_TTL_SECS, DEFAULT_UPSTREAM_TIMEOUT_SECS};
use thiserror::Error;

/// アップロードボディの既定上限（20 MiB）
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name} is invalid: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// カレントディレクトリから親方向に探した `.env` を環境変数に読み込む
///
/// ファイルがなければ何もしない。既に設定済みの環境変数は上書きしない。
pub fn load_dotenv() -> Result<Option<PathBuf>, dotenvy::Error> {
    ignore_missing(dotenvy::dotenv())
}

fn ignore_missing(
    result: Result<PathBuf, dotenvy::Error>,
) -> Result<Option<PathBuf>, dotenvy::Error> {
    match result {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

#[derive(Clone)]
pub struct Config {
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub port: u16,
    /// S3 互換ストレージ（MinIO など）のエンドポイント
    /// 指定時は path-style でアクセスする
    pub endpoint_url: Option<String>,
    pub signed_url_ttl: Duration,
    pub upstream_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl Config {
    /// 環境変数から Config を作成する
    ///
    /// 必須の環境変数:
    /// - AWS_REGION
    /// - ACCESS_KEY
    /// - SECRET_ACCESS_KEY
    /// - S3_BUCKET_NAME
    /// - PORT
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        Ok(Self {
            region: required("AWS_REGION")?,
            access_key: required("ACCESS_KEY")?,
            secret_key: required("SECRET_ACCESS_KEY")?,
            bucket: required("S3_BUCKET_NAME")?,
            port: parse("PORT", &required("PORT")?)?,
            endpoint_url: get("S3_ENDPOINT_URL"),
            signed_url_ttl: Duration::from_secs(
                get("SIGNED_URL_TTL_SECS")
                    .map(|v| parse_positive("SIGNED_URL_TTL_SECS", &v))
                    .transpose()?
                    .unwrap_or(DEFAULT_SIGNED_URL_TTL_SECS),
            ),
            upstream_timeout: Duration::from_secs(
                get("UPSTREAM_TIMEOUT_SECS")
                    .map(|v| parse_positive("UPSTREAM_TIMEOUT_SECS", &v))
                    .transpose()?
                    .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            ),
            max_upload_bytes: get("MAX_UPLOAD_BYTES")
                .map(|v| parse("MAX_UPLOAD_BYTES", &v))
                .transpose()?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        })
    }

    pub fn settings(&self) -> GallerySettings {
        GallerySettings {
            signed_url_ttl: self.signed_url_ttl,
            upstream_timeout: self.upstream_timeout,
        }
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}

fn parse_positive(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    match parse::<u64>(name, value)? {
        0 => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        }),
        n => Ok(n),
    }
}

// シークレットをログに出さない
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .field("port", &self.port)
            .field("endpoint_url", &self.endpoint_url)
            .field("signed_url_ttl", &self.signed_url_ttl)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}
