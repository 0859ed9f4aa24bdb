use std::path::PathBuf;
use thiserror::Error;

/// 页面文本来源错误（文档提取协作方失败）
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("读取文件失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF 解析失败: {0}")]
    Extraction(String),
    #[error("无法识别文件扩展名: {0:?}")]
    UnknownExtension(PathBuf),
    #[error("不支持的文件格式: {0}")]
    Unsupported(String),
}

/// 输出写入错误
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("写入目标文件失败: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// 一次完整解析运行的错误
///
/// 只有协作方失败与输入缺失会越过解析核心的边界，
/// 结构上的歧义一律在内部丢弃，不会出现在这里。
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("找不到输入文件: {0:?}")]
    MissingInput(PathBuf),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error("配置错误: {0}")]
    Config(String),
}
