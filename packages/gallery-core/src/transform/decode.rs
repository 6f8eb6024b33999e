use image::{DynamicImage, ImageReader};
use std::io::Cursor;

use crate::constants::MAX_PIXELS;
use crate::errors::TransformError;

/// 画像バイト列をデコードする
///
/// フォーマットはバイト列の先頭から推測する（キーの拡張子は信用しない）
pub fn decode_image(input: &[u8]) -> Result<DynamicImage, TransformError> {
    let reader = ImageReader::new(Cursor::new(input))
        .with_guessed_format()
        .map_err(|e| TransformError::ProcessingFailed(format!("failed to guess format: {e}")))?;

    if reader.format().is_none() {
        return Err(TransformError::ProcessingFailed(
            "unsupported image format".to_string(),
        ));
    }

    let img = reader
        .decode()
        .map_err(|e| TransformError::ProcessingFailed(format!("decode failed: {e}")))?;

    validate_source_dimensions(img.width(), img.height())?;

    Ok(img)
}

/// ソース画像の総ピクセル数を検証し、メモリ枯渇を防ぐ
fn validate_source_dimensions(width: u32, height: u32) -> Result<(), TransformError> {
    if width as u64 * height as u64 > MAX_PIXELS {
        return Err(TransformError::ResolutionTooLarge { width, height });
    }
    Ok(())
}
