/// リサイズ後の最大寸法（幅・高さ）
pub const MAX_DIMENSION: u32 = 4096;

/// 元画像の最大ピクセル数（デコード後のメモリ枯渇を防止）
pub const MAX_PIXELS: u64 = 100_000_000;

/// JPEG エンコード時のデフォルト品質（1-100）
pub const DEFAULT_QUALITY: u8 = 80;

/// オブジェクトキーの最大長（S3 の上限に合わせる）
pub const MAX_KEY_LENGTH: usize = 1024;

/// アップロードされた元画像の保存先プレフィックス
pub const UPLOAD_PREFIX: &str = "myuploads";

/// 派生画像（リサイズ済み）の保存先プレフィックス
pub const DERIVED_PREFIX: &str = "derived";

/// 署名付き URL のデフォルト有効期限（秒）
pub const DEFAULT_SIGNED_URL_TTL_SECS: u64 = 3600;

/// 上流呼び出し（ストレージ・変換）1 回あたりのデフォルトタイムアウト（秒）
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;
