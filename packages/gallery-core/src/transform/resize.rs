use crate::constants::MAX_PIXELS;
use crate::errors::TransformError;
use crate::transform::dimensions::CropBox;
use crate::transform::params::Dimensions;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};
use image::{DynamicImage, RgbImage, RgbaImage};

/// 画像の `crop` 領域を `target` の寸法にリサイズする
///
/// fast_image_resize の Lanczos3 フィルタを使用する。
/// アルファチャンネルを持つ画像は RGBA のまま処理する。
pub fn resize_image(
    img: &DynamicImage,
    target: Dimensions,
    crop: CropBox,
) -> Result<DynamicImage, TransformError> {
    if target.pixels() > MAX_PIXELS {
        return Err(TransformError::ResolutionTooLarge {
            width: target.width,
            height: target.height,
        });
    }

    let has_alpha = img.color().has_alpha();
    let (pixel_type, raw) = if has_alpha {
        (PixelType::U8x4, img.to_rgba8().into_raw())
    } else {
        (PixelType::U8x3, img.to_rgb8().into_raw())
    };

    let src_image = Image::from_vec_u8(img.width(), img.height(), raw, pixel_type).map_err(|e| {
        TransformError::ProcessingFailed(format!("failed to create source image: {e}"))
    })?;
    let mut dst_image = Image::new(target.width, target.height, pixel_type);

    let options = ResizeOptions::new()
        .resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3))
        .crop(crop.left, crop.top, crop.width, crop.height);

    Resizer::new()
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|e| TransformError::ProcessingFailed(format!("resize failed: {e}")))?;

    let buf = dst_image.into_vec();
    let resized = if has_alpha {
        RgbaImage::from_raw(target.width, target.height, buf).map(DynamicImage::ImageRgba8)
    } else {
        RgbImage::from_raw(target.width, target.height, buf).map(DynamicImage::ImageRgb8)
    };

    resized.ok_or_else(|| {
        TransformError::ProcessingFailed("failed to convert resized image".to_string())
    })
}
