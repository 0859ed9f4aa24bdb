use super::*;
use std::fs;

/// PDF 提取器（基础版）
///
/// 逐页提取纯文本 PDF 的文字，不支持扫描版 PDF
#[derive(Clone)]
pub struct PdfParser;

impl PdfParser {
    /// 创建新的 PDF 提取器实例
    pub fn new() -> Self {
        Self
    }

    /// 从内存中的 PDF 字节逐页提取文本
    pub fn extract_pages(&self, bytes: &[u8]) -> Result<ExtractedPages, SourceError> {
        let texts = pdf_extract::extract_text_from_mem_by_pages(bytes)
            .map_err(|e| SourceError::Extraction(e.to_string()))?;

        let pages = ExtractedPages::from_texts(texts);
        tracing::info!("PDF 共 {} 页，其中 {} 页有文本", pages.len(), pages.text_page_count());

        if pages.text_page_count() == 0 {
            tracing::warn!("此 PDF 没有可提取的文本，可能是扫描版或已加密");
        }

        Ok(pages)
    }
}

impl PageExtractor for PdfParser {
    fn open(&self, file_path: &Path) -> Result<Box<dyn PageSource>, SourceError> {
        let bytes = fs::read(file_path)?;
        Ok(Box::new(self.extract_pages(&bytes)?))
    }

    fn supported_extensions(&self) -> Vec<&str> {
        vec!["pdf"]
    }
}

impl Default for PdfParser {
    fn default() -> Self {
        Self::new()
    }
}
