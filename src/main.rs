use std::path::PathBuf;
use std::process::exit;

use anyhow::{Context, Result};
use clap::Parser;

use scripture_corpus_lib::config::ParserConfig;
use scripture_corpus_lib::logging::init_logging;
use scripture_corpus_lib::run_file;

#[derive(Parser, Debug)]
#[command(author, version, about = "将经文 PDF 解析为 卷/章/节 JSON", long_about = None)]
struct Cli {
    /// 输入文档（.pdf 或以分页符分页的 .txt）
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// 输出 JSON 路径
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// TOML 配置文件（书名列表、标题余量、页码阈值）
    #[arg(long, value_name = "FILE", env = "CORPUS_CONFIG")]
    config: Option<PathBuf>,

    /// 输出调试日志
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn load_config(cli: &Cli) -> Result<ParserConfig> {
    match &cli.config {
        Some(path) => ParserConfig::from_file(path)
            .with_context(|| format!("加载配置 {:?} 失败", path)),
        None => Ok(ParserConfig::default()),
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit(1);
        }
    };

    init_logging(if cli.verbose { "debug" } else { config.log_level.as_str() });

    match run_file(&cli.input, &cli.output, &config) {
        Ok(summary) => {
            tracing::info!(
                "完成: {} 卷 / {} 章 / {} 节，检查点 {} 次",
                summary.books,
                summary.chapters,
                summary.verses,
                summary.checkpoints
            );
        }
        Err(e) => {
            tracing::error!("解析失败: {}", e);
            exit(1);
        }
    }
}
