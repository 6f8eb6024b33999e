use bytes::Bytes;

use crate::constants::DEFAULT_QUALITY;
use crate::errors::TransformError;
use crate::transform::decode::decode_image;
use crate::transform::dimensions::calculate_cover_crop;
use crate::transform::encode::encode_image;
use crate::transform::orientation::Orientation;
use crate::transform::params::{Dimensions, OutputFormat};
use crate::transform::resize::resize_image;
use crate::validation::{validate_dimensions, validate_quality};

/// 画像のリサイズ処理
///
/// 状態を持たない純粋関数として振る舞うこと。同じ入力には同じバイト列を返す。
/// CPU バウンドな処理のため、呼び出し側はブロッキングスレッドで実行する。
pub trait Transcoder: Send + Sync + 'static {
    fn resize(
        &self,
        input: &[u8],
        target: Dimensions,
        format: OutputFormat,
    ) -> Result<Bytes, TransformError>;
}

/// image / fast_image_resize による Transcoder 実装
#[derive(Debug, Clone, Copy)]
pub struct ImageTranscoder {
    quality: u8,
}

impl ImageTranscoder {
    /// JPEG 品質を指定して作成する（1-100）
    pub fn with_quality(quality: u8) -> Result<Self, TransformError> {
        validate_quality(quality)?;
        Ok(Self { quality })
    }
}

impl Default for ImageTranscoder {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
        }
    }
}

impl Transcoder for ImageTranscoder {
    /// デコード → EXIF 回転補正 → Cover リサイズ → エンコード
    ///
    /// 出力は必ず `target` の寸法ちょうどになる。
    /// メタデータ (EXIF/XMP) はデコード・エンコードサイクルで削除される。
    fn resize(
        &self,
        input: &[u8],
        target: Dimensions,
        format: OutputFormat,
    ) -> Result<Bytes, TransformError> {
        validate_dimensions(target.width, target.height)?;

        let img = Orientation::from_exif(input).apply(decode_image(input)?);
        let crop = calculate_cover_crop(img.width(), img.height(), target.width, target.height);
        let resized = resize_image(&img, target, crop)?;
        let output = encode_image(&resized, format, self.quality)?;

        Ok(Bytes::from(output))
    }
}
