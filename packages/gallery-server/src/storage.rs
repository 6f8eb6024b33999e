use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use gallery_core::S3ObjectStore;

use crate::config::Config;

/// 設定から S3 クライアントを組み立てる
///
/// 認証情報は環境変数で渡されたものだけを使い、AWS の既定チェーンは参照しない
pub fn build_object_store(config: &Config) -> S3ObjectStore {
    let credentials = Credentials::new(
        &config.access_key,
        &config.secret_key,
        None,
        None,
        "gallery-env",
    );

    let mut builder = aws_sdk_s3::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .credentials_provider(credentials);

    if let Some(endpoint) = &config.endpoint_url {
        builder = builder.endpoint_url(endpoint).force_path_style(true);
    }

    let client = aws_sdk_s3::Client::from_conf(builder.build());
    S3ObjectStore::new(client, config.bucket.clone())
}
