/// 验证文件内容的魔术字节是否与扩展名匹配
///
/// # Arguments
/// * `data` - 文件内容的前几个字节
/// * `extension` - 文件扩展名（包含点号，如 ".zip"）
///
/// # Returns
/// * `true` - 魔术字节匹配
/// * `false` - 魔术字节不匹配或扩展名不是已知的压缩格式
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    match extension.to_lowercase().as_str() {
        // 普通、空归档与分卷 ZIP
        ".zip" => {
            data.starts_with(&[0x50, 0x4B, 0x03, 0x04])
                || data.starts_with(&[0x50, 0x4B, 0x05, 0x06])
                || data.starts_with(&[0x50, 0x4B, 0x07, 0x08])
        }
        ".rar" => data.starts_with(b"Rar!"),
        ".7z" => data.starts_with(&[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C]),
        ".gz" | ".tgz" => data.starts_with(&[0x1F, 0x8B]),
        _ => false,
    }
}

/// 取文件名的扩展名（小写，含点号）
pub fn file_extension(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_magic() {
        let zip_header = [0x50, 0x4B, 0x03, 0x04, 0x14, 0x00];
        assert!(validate_magic_bytes(&zip_header, ".zip"));
        assert!(validate_magic_bytes(&zip_header, ".ZIP"));
        assert!(validate_magic_bytes(&[0x50, 0x4B, 0x05, 0x06], ".zip"));
        assert!(!validate_magic_bytes(&zip_header, ".rar"));
    }

    #[test]
    fn test_other_archives() {
        assert!(validate_magic_bytes(b"Rar!\x1A\x07", ".rar"));
        assert!(validate_magic_bytes(&[0x1F, 0x8B, 0x08], ".gz"));
        assert!(!validate_magic_bytes(b"%PDF-1.4", ".zip"));
    }

    #[test]
    fn test_empty_data() {
        assert!(!validate_magic_bytes(&[], ".zip"));
    }

    #[test]
    fn test_unknown_extension() {
        let data = [0x50, 0x4B, 0x03, 0x04];
        assert!(!validate_magic_bytes(&data, ".exe"));
        assert!(!validate_magic_bytes(&data, ".pdf"));
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("hw.zip").as_deref(), Some(".zip"));
        assert_eq!(file_extension("HW.Final.ZIP").as_deref(), Some(".zip"));
        assert_eq!(file_extension("hw.pdf").as_deref(), Some(".pdf"));
        assert_eq!(file_extension("archive"), None);
        assert_eq!(file_extension(".zip"), None);
        assert_eq!(file_extension("hw."), None);
    }
}
