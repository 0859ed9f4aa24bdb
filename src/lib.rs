use std::path::Path;

pub mod config;
pub mod corpus;
pub mod error;
pub mod logging;
pub mod parser;

use config::ParserConfig;
use corpus::{Checkpointer, CorpusDriver, JsonFileSink, RunSummary};
use error::CorpusError;
use parser::SourceRouter;

/// 解析一个文档并写出 JSON 语料
///
/// 1. 检查输入文件是否存在（不存在则不做任何提取）
/// 2. 按扩展名选择提取器并打开文档
/// 3. 逐页解析，书卷切换时和结束时写检查点
pub fn run_file(input: &Path, output: &Path, config: &ParserConfig) -> Result<RunSummary, CorpusError> {
    if !input.exists() {
        return Err(CorpusError::MissingInput(input.to_path_buf()));
    }

    let driver = CorpusDriver::new(config)?;

    tracing::info!("正在解析: {:?}", input);
    let mut source = SourceRouter::new().open(input)?;

    let mut checkpointer = Checkpointer::new(JsonFileSink::new(output));
    let report = driver.run(source.as_mut(), &mut checkpointer)?;

    tracing::info!("已写入 {:?}", output);
    Ok(report.summary)
}
