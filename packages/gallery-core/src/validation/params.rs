use crate::constants::MAX_DIMENSION;
use crate::errors::{MediaError, TransformError};
use crate::transform::Dimensions;

/// リサイズ先の寸法を検証する（1-MAX_DIMENSION）
pub fn validate_dimensions(width: u32, height: u32) -> Result<(), TransformError> {
    if width == 0 || width > MAX_DIMENSION {
        return Err(TransformError::InvalidParams(format!(
            "width must be 1-{MAX_DIMENSION}, got {width}"
        )));
    }

    if height == 0 || height > MAX_DIMENSION {
        return Err(TransformError::InvalidParams(format!(
            "height must be 1-{MAX_DIMENSION}, got {height}"
        )));
    }

    Ok(())
}

/// JPEG 品質を検証する（1-100）
pub fn validate_quality(quality: u8) -> Result<(), TransformError> {
    if quality == 0 || quality > 100 {
        return Err(TransformError::InvalidParams(format!(
            "quality must be 1-100, got {quality}"
        )));
    }
    Ok(())
}

/// パスセグメント `{width}x{height}` をパースして検証する
pub fn parse_dimensions(segment: &str) -> Result<Dimensions, MediaError> {
    let dims = Dimensions::parse(segment).ok_or_else(|| {
        MediaError::Validation(format!("malformed dimensions: {segment}"))
    })?;
    validate_dimensions(dims.width, dims.height)?;
    Ok(dims)
}
