// 经文语料模块
// 将逐行文本还原为 卷 → 章 → 节 的层级结构

pub mod types;
pub mod line_classifier;
pub mod hierarchy_builder;
pub mod checkpoint;
pub mod driver;


// 重新导出主要类型
pub use types::*;
pub use line_classifier::LineClassifier;
pub use hierarchy_builder::HierarchyBuilder;
pub use checkpoint::{Checkpointer, JsonFileSink, MemorySink, OutputSink};
pub use driver::{CorpusDriver, RunReport, RunSummary};
