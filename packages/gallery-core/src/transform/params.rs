use std::fmt;

/// 出力フォーマット
///
/// 派生画像は元画像のキーの拡張子から決まるフォーマットで保存する
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    /// オブジェクトキーの拡張子から OutputFormat を推定する
    ///
    /// `.png`（大文字小文字を区別しない）のみ PNG、それ以外はすべて JPEG
    pub fn from_key(key: &str) -> Self {
        let file_name = key.rsplit('/').next().unwrap_or(key);
        match file_name.rsplit_once('.') {
            Some((_, ext)) if ext.eq_ignore_ascii_case("png") => Self::Png,
            _ => Self::Jpeg,
        }
    }

    /// Content-Type を取得
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

/// キーから Content-Type を推定する
pub fn content_type_for_key(key: &str) -> &'static str {
    OutputFormat::from_key(key).content_type()
}

/// リサイズ先の寸法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `{width}x{height}` 形式の文字列をパースする
    ///
    /// 数字以外（符号・空白を含む）が混ざっている場合や u32 に収まらない場合は None
    pub fn parse(s: &str) -> Option<Self> {
        let (w, h) = s.split_once('x')?;
        let is_digits = |v: &str| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit());
        if !is_digits(w) || !is_digits(h) {
            return None;
        }

        Some(Self::new(w.parse().ok()?, h.parse().ok()?))
    }

    pub fn pixels(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
