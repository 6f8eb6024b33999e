/// 元画像から切り出す矩形（ピクセル単位、小数を許容）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Cover モードの切り出し領域を計算する
///
/// 出力が指定寸法ちょうどになるよう、アスペクト比を維持したまま
/// 中央を基準に元画像をトリミングする。拡大も許可する。
pub fn calculate_cover_crop(src_w: u32, src_h: u32, target_w: u32, target_h: u32) -> CropBox {
    let (src_w64, src_h64) = (src_w as u64, src_h as u64);
    let (target_w64, target_h64) = (target_w as u64, target_h as u64);

    // target_w / target_h >= src_w / src_h なら幅いっぱいを使い、高さを削る
    let (width, height) = if target_w64 * src_h64 >= target_h64 * src_w64 {
        let height = (src_w64 * target_h64) as f64 / target_w64 as f64;
        (src_w as f64, height)
    } else {
        let width = (src_h64 * target_w64) as f64 / target_h64 as f64;
        (width, src_h as f64)
    };

    CropBox {
        left: (src_w as f64 - width) / 2.0,
        top: (src_h as f64 - height) / 2.0,
        width,
        height,
    }
}
