use super::checkpoint::{Checkpointer, OutputSink};
use super::hierarchy_builder::HierarchyBuilder;
use super::line_classifier::LineClassifier;
use super::types::Corpus;
use crate::config::ParserConfig;
use crate::error::CorpusError;
use crate::parser::PageSource;

/// 一次运行的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// 读取的页数
    pub pages: usize,
    /// 无文本而跳过的页数
    pub skipped_pages: usize,
    /// 送入分类器的非空行数
    pub lines: usize,
    pub books: usize,
    pub chapters: usize,
    pub verses: usize,
    /// 写入的检查点数（含结束时的一次）
    pub checkpoints: usize,
}

/// 运行结果
#[derive(Debug, Clone)]
pub struct RunReport {
    pub corpus: Corpus,
    pub summary: RunSummary,
}

/// 把页面文本切成有序的非空行
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(str::trim).filter(|l| !l.is_empty())
}

/// Corpus Driver
///
/// 严格按文档顺序遍历 页 → 行，驱动分类器与构建器，
/// 在书卷切换时和结束时写检查点。
pub struct CorpusDriver {
    classifier: LineClassifier,
}

impl CorpusDriver {
    pub fn new(config: &ParserConfig) -> Result<Self, CorpusError> {
        Ok(Self {
            classifier: LineClassifier::from_config(config)?,
        })
    }

    /// 运行一次完整解析
    ///
    /// 页面来源或输出失败时立即中止；结构上的异常全部在内部吸收。
    /// 每次调用使用全新的解析状态。
    pub fn run<S: OutputSink>(
        &self,
        source: &mut dyn PageSource,
        checkpointer: &mut Checkpointer<S>,
    ) -> Result<RunReport, CorpusError> {
        let mut builder = HierarchyBuilder::new();
        let mut summary = RunSummary::default();
        let checkpoints_before = checkpointer.written();

        for page in source.pages() {
            let page = page?;
            summary.pages += 1;

            let Some(text) = page.text else {
                tracing::debug!("第 {} 页没有可提取的文本，跳过", page.index + 1);
                summary.skipped_pages += 1;
                continue;
            };

            for line in split_lines(&text) {
                summary.lines += 1;
                let event = self.classifier.classify(line, builder.state());
                builder.apply_with_checkpoint(event, |corpus| checkpointer.checkpoint(corpus))?;
            }
        }

        checkpointer.checkpoint(builder.corpus())?;

        let corpus = builder.into_corpus();
        summary.books = corpus.book_count();
        summary.chapters = corpus.chapter_count();
        summary.verses = corpus.verse_count();
        summary.checkpoints = checkpointer.written() - checkpoints_before;

        tracing::info!(
            "解析完成: {} 页（跳过 {}），{} 卷 / {} 章 / {} 节",
            summary.pages,
            summary.skipped_pages,
            summary.books,
            summary.chapters,
            summary.verses
        );

        Ok(RunReport { corpus, summary })
    }
}
