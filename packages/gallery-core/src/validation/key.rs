use crate::constants::{MAX_KEY_LENGTH, UPLOAD_PREFIX};
use crate::errors::MediaError;

/// オブジェクトキーを検証する
/// パストラバーサル攻撃を防止し、制御文字を検出する
pub fn validate_key(key: &str) -> Result<(), MediaError> {
    if key.is_empty() {
        return Err(MediaError::Validation("key is empty".to_string()));
    }

    if key.len() > MAX_KEY_LENGTH {
        return Err(MediaError::Validation(format!(
            "key is too long (max {MAX_KEY_LENGTH})"
        )));
    }

    // パーセントエンコードされた `..` もすり抜けないようデコード後に検査する
    let decoded = urlencoding::decode(key)
        .map_err(|_| MediaError::Validation("invalid URL encoding".to_string()))?;

    for candidate in [key, decoded.as_ref()] {
        if candidate.starts_with('/')
            || candidate.contains("//")
            || candidate.contains('\\')
            || candidate.split('/').any(|segment| segment == ".." || segment == ".")
        {
            return Err(MediaError::Validation("path traversal detected".to_string()));
        }
    }

    if key.chars().any(char::is_control) {
        return Err(MediaError::Validation("invalid characters in key".to_string()));
    }

    Ok(())
}

/// アップロードされたファイル名から保存先キーを組み立てる
///
/// クライアントが送るファイル名はディレクトリ部分を含むことがあるため、
/// 最後の要素だけを使う
pub fn upload_key(file_name: &str) -> Result<String, MediaError> {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() || base == "." || base == ".." {
        return Err(MediaError::Validation(format!(
            "invalid file name: {file_name:?}"
        )));
    }

    let key = format!("{UPLOAD_PREFIX}/{base}");
    validate_key(&key)?;
    Ok(key)
}
