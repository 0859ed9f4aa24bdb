use std::collections::HashMap;
use std::path::Path;

use crate::error::SourceError;

// 子模块声明
pub mod pdf_parser;
pub mod txt_parser;

/// 一页提取结果
///
/// `text` 为 None 表示该页没有可提取的文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 页序号（从 0 开始）
    pub index: usize,
    pub text: Option<String>,
}

pub type PageIter<'a> = Box<dyn Iterator<Item = Result<Page, SourceError>> + 'a>;

/// 页面文本来源
///
/// 按文档顺序惰性产出页面；任一项为 Err 即视为提取失败
pub trait PageSource {
    fn pages(&mut self) -> PageIter<'_>;
}

/// 已提取到内存中的页面
#[derive(Debug, Clone, Default)]
pub struct ExtractedPages {
    pages: Vec<Option<String>>,
}

impl ExtractedPages {
    pub fn new(pages: Vec<Option<String>>) -> Self {
        Self { pages }
    }

    /// 由每页文本构造，空白页记为 None
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pages = texts
            .into_iter()
            .map(|t| {
                let t: String = t.into();
                if t.trim().is_empty() { None } else { Some(t) }
            })
            .collect();
        Self { pages }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// 有文本的页数
    pub fn text_page_count(&self) -> usize {
        self.pages.iter().filter(|p| p.is_some()).count()
    }
}

impl PageSource for ExtractedPages {
    fn pages(&mut self) -> PageIter<'_> {
        Box::new(
            self.pages
                .iter()
                .enumerate()
                .map(|(index, text)| Ok(Page { index, text: text.clone() })),
        )
    }
}

/// 文档提取器 trait
///
/// 每种文档格式实现此 trait，打开文件得到页面来源
pub trait PageExtractor {
    /// 打开文件
    ///
    /// # 参数
    /// - `file_path`: 文档路径
    ///
    /// # 返回
    /// 页面来源；文件无法读取或提取库失败时返回错误
    fn open(&self, file_path: &Path) -> Result<Box<dyn PageSource>, SourceError>;

    /// 获取支持的文件扩展名列表
    fn supported_extensions(&self) -> Vec<&str>;
}

/// 提取器路由
///
/// 根据文件扩展名路由到对应的提取器
pub struct SourceRouter {
    /// 扩展名到提取器的映射
    extractors: HashMap<String, Box<dyn PageExtractor>>,
}

impl SourceRouter {
    /// 创建新的路由器实例
    ///
    /// 注册所有可用的提取器
    pub fn new() -> Self {
        let mut extractors: HashMap<String, Box<dyn PageExtractor>> = HashMap::new();

        // 注册 PDF 提取器
        let pdf = Box::new(pdf_parser::PdfParser::new());
        for ext in pdf.supported_extensions() {
            extractors.insert(ext.to_string(), pdf.clone());
        }

        // 注册 TXT 提取器
        let txt = Box::new(txt_parser::TxtParser::new());
        for ext in txt.supported_extensions() {
            extractors.insert(ext.to_string(), txt.clone());
        }

        Self { extractors }
    }

    /// 根据文件路径路由到对应的提取器
    pub fn route(&self, file_path: &Path) -> Result<&dyn PageExtractor, SourceError> {
        let ext = file_path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| SourceError::UnknownExtension(file_path.to_path_buf()))?
            .to_lowercase();

        self.extractors
            .get(&ext)
            .map(|p| p.as_ref())
            .ok_or(SourceError::Unsupported(ext))
    }

    /// 路由并打开文档
    pub fn open(&self, file_path: &Path) -> Result<Box<dyn PageSource>, SourceError> {
        self.route(file_path)?.open(file_path)
    }
}

impl Default for SourceRouter {
    fn default() -> Self {
        Self::new()
    }
}
