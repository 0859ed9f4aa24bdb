use super::*;
use encoding_rs::*;
use std::fs;

/// 分页符
const FORM_FEED: char = '\u{000C}';

/// TXT 提取器
///
/// 用于已从文档中导出的纯文本，页与页之间以分页符（\f）分隔。
/// 自动检测编码（UTF-8, GBK 等）
#[derive(Clone)]
pub struct TxtParser;

impl TxtParser {
    /// 创建新的 TXT 提取器实例
    pub fn new() -> Self {
        Self
    }

    /// 检测文件编码
    ///
    /// 尝试检测文件的字符编码，支持 UTF-8、GBK 等常见编码
    ///
    /// # 参数
    /// - `bytes`: 文件字节数据
    ///
    /// # 返回
    /// 检测到的编码
    fn detect_encoding(&self, bytes: &[u8]) -> &'static Encoding {
        // 1. 检查 BOM (Byte Order Mark)
        if let Some((encoding, _bom_length)) = Encoding::for_bom(bytes) {
            return encoding;
        }

        // 2. 尝试 UTF-8 解码
        if std::str::from_utf8(bytes).is_ok() {
            return UTF_8;
        }

        // 3. 检测是否为 GBK
        if self.looks_like_gbk(bytes) {
            return GBK;
        }

        // 4. 默认使用 UTF-8
        UTF_8
    }

    /// 检测字节序列是否像 GBK 编码
    ///
    /// GBK 编码特征：
    /// - 第一字节范围：0x81-0xFE
    /// - 第二字节范围：0x40-0xFE
    fn looks_like_gbk(&self, bytes: &[u8]) -> bool {
        let mut gbk_pairs = 0;
        let mut total_pairs = 0;

        let mut i = 0;
        while i < bytes.len().saturating_sub(1) {
            let b1 = bytes[i];
            let b2 = bytes[i + 1];

            if b1 < 0x80 {
                i += 1;
                continue;
            }

            total_pairs += 1;

            if (0x81..=0xFE).contains(&b1) && (0x40..=0xFE).contains(&b2) {
                gbk_pairs += 1;
                i += 2;
            } else {
                i += 1;
            }
        }

        // 超过 50% 的非 ASCII 字节对符合 GBK 规则，则认为是 GBK
        total_pairs > 0 && (gbk_pairs as f32 / total_pairs as f32) > 0.5
    }

    /// 解码并按分页符切分
    pub fn extract_pages(&self, bytes: &[u8]) -> ExtractedPages {
        let encoding = self.detect_encoding(bytes);
        let (content, encoding_used, had_errors) = encoding.decode(bytes);
        if had_errors {
            tracing::warn!("按 {} 解码时出现错误，可能存在乱码", encoding_used.name());
        }

        // 末尾的分页符不产生额外空页
        let content: &str = &content;
        let content = content.strip_suffix(FORM_FEED).unwrap_or(content);
        ExtractedPages::from_texts(content.split(FORM_FEED))
    }
}

impl PageExtractor for TxtParser {
    fn open(&self, file_path: &Path) -> Result<Box<dyn PageSource>, SourceError> {
        let bytes = fs::read(file_path)?;
        Ok(Box::new(self.extract_pages(&bytes)))
    }

    fn supported_extensions(&self) -> Vec<&str> {
        vec!["txt"]
    }
}

impl Default for TxtParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn page_texts(pages: &mut ExtractedPages) -> Vec<Option<String>> {
        pages.pages().map(|p| p.unwrap().text).collect()
    }

    #[test]
    fn test_txt_parser_creation() {
        let parser = TxtParser::new();
        assert_eq!(parser.supported_extensions(), vec!["txt"]);
    }

    #[test]
    fn test_detect_utf8_encoding() {
        let parser = TxtParser::new();
        let encoding = parser.detect_encoding("起初，神創造天地。".as_bytes());
        assert_eq!(encoding, UTF_8);
    }

    #[test]
    fn test_detect_ascii_encoding() {
        let parser = TxtParser::new();
        let encoding = parser.detect_encoding(b"In the beginning");
        assert_eq!(encoding, UTF_8); // ASCII 兼容 UTF-8
    }

    #[test]
    fn test_detect_bom() {
        let parser = TxtParser::new();
        let bytes = [0xFF, 0xFE, b'1', 0x00];
        assert_eq!(parser.detect_encoding(&bytes), UTF_16LE);
    }

    #[test]
    fn test_looks_like_gbk() {
        let parser = TxtParser::new();

        // GBK 编码的 "测试" (0xB2E2 0xCAD4)
        let gbk_bytes = vec![0xB2, 0xE2, 0xCA, 0xD4];
        assert!(parser.looks_like_gbk(&gbk_bytes));

        assert!(!parser.looks_like_gbk(b"Hello World"));
    }

    #[test]
    fn test_gbk_file_is_decoded() {
        let parser = TxtParser::new();
        let (bytes, _, _) = GBK.encode("创世记\n1 起初");
        let mut pages = parser.extract_pages(&bytes);

        assert_eq!(page_texts(&mut pages), vec![Some("创世记\n1 起初".to_string())]);
    }

    #[test]
    fn test_split_pages_on_form_feed() {
        let parser = TxtParser::new();
        let content = "創世記\n1 起初\u{000C}\n \n\u{000C}2 地是空虛混沌。\u{000C}";
        let mut pages = parser.extract_pages(content.as_bytes());

        assert_eq!(
            page_texts(&mut pages),
            vec![
                Some("創世記\n1 起初".to_string()),
                None,
                Some("2 地是空虛混沌。".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_file() {
        let parser = TxtParser::new();
        let mut pages = parser.extract_pages(b"");
        assert_eq!(page_texts(&mut pages), vec![None]);
    }

    #[test]
    fn test_open_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bible.txt");
        fs::write(&path, "創世記\n1 起初").unwrap();

        let parser = TxtParser::new();
        let mut source = parser.open(&path).unwrap();
        let pages: Vec<Page> = source.pages().map(|p| p.unwrap()).collect();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].text.as_deref(), Some("創世記\n1 起初"));
    }
}
