use base64::Engine;
use std::path::Path;

/// 一张待识别的答题卡图片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetImage {
    /// 文件名（仅用于日志和报告）
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SheetImage {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// 根据扩展名推断 MIME 类型，不支持的格式返回 `None`
    pub fn mime_type_for(path: &Path) -> Option<&'static str> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some("image/jpeg"),
            "png" => Some("image/png"),
            "webp" => Some("image/webp"),
            _ => None,
        }
    }

    /// 转换为可直接放进 Vision 请求的 data URL
    pub fn to_data_url(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{}", self.mime_type, encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url() {
        let image = SheetImage::new("a.png", "image/png", b"abc".to_vec());
        assert_eq!(image.to_data_url(), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_mime_type_for() {
        assert_eq!(SheetImage::mime_type_for(Path::new("x/1.JPG")), Some("image/jpeg"));
        assert_eq!(SheetImage::mime_type_for(Path::new("2.png")), Some("image/png"));
        assert_eq!(SheetImage::mime_type_for(Path::new("notes.txt")), None);
        assert_eq!(SheetImage::mime_type_for(Path::new("noext")), None);
    }
}
