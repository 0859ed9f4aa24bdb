use std::fs;
use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;

use super::types::Corpus;
use crate::error::SinkError;

/// 输出目标
///
/// 每次写入的都是完整语料，覆盖之前的内容
pub trait OutputSink {
    fn write(&mut self, corpus: &Corpus) -> Result<(), SinkError>;
}

/// 将语料序列化为带缩进的 UTF-8 JSON
///
/// 非 ASCII 字符原样保留
pub fn to_json_bytes(corpus: &Corpus) -> Result<Vec<u8>, SinkError> {
    let mut bytes = serde_json::to_vec_pretty(corpus)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// JSON 文件输出
///
/// 先写入同目录的临时文件再重命名覆盖，中途中断不会留下半截文件
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputSink for JsonFileSink {
    fn write(&mut self, corpus: &Corpus) -> Result<(), SinkError> {
        let bytes = to_json_bytes(corpus)?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;
        Ok(())
    }
}

/// 内存输出，保留每次写入的字节
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub writes: Vec<Vec<u8>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&[u8]> {
        self.writes.last().map(|w| w.as_slice())
    }
}

impl OutputSink for MemorySink {
    fn write(&mut self, corpus: &Corpus) -> Result<(), SinkError> {
        self.writes.push(to_json_bytes(corpus)?);
        Ok(())
    }
}

/// 增量检查点
///
/// 在书卷切换前和运行结束时整体重写语料
pub struct Checkpointer<S: OutputSink> {
    sink: S,
    written: usize,
}

impl<S: OutputSink> Checkpointer<S> {
    pub fn new(sink: S) -> Self {
        Self { sink, written: 0 }
    }

    pub fn checkpoint(&mut self, corpus: &Corpus) -> Result<(), SinkError> {
        self.sink.write(corpus)?;
        self.written += 1;
        tracing::debug!(
            "检查点 #{}: {} 卷 / {} 节",
            self.written,
            corpus.book_count(),
            corpus.verse_count()
        );
        Ok(())
    }

    /// 已成功写入的检查点数
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_corpus() -> Corpus {
        let mut corpus = Corpus::new();
        let book = corpus.book_mut_or_insert("創世記");
        book.chapter_mut(1).set_verse(1, "起初，神創造天地。".to_string());
        corpus
    }

    struct FailingSink;

    impl OutputSink for FailingSink {
        fn write(&mut self, _corpus: &Corpus) -> Result<(), SinkError> {
            Err(SinkError::Io(std::io::Error::new(std::io::ErrorKind::Other, "磁盘已满")))
        }
    }

    #[test]
    fn test_json_keeps_non_ascii() {
        let bytes = to_json_bytes(&sample_corpus()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("起初，神創造天地。"));
        assert!(text.contains("\"1\": {"));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn test_repeated_checkpoint_is_byte_identical() {
        let corpus = sample_corpus();
        let mut checkpointer = Checkpointer::new(MemorySink::new());
        checkpointer.checkpoint(&corpus).unwrap();
        checkpointer.checkpoint(&corpus).unwrap();

        let writes = &checkpointer.sink().writes;
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0], writes[1]);
        assert_eq!(checkpointer.written(), 2);
    }

    #[test]
    fn test_file_sink_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bible_text.json");
        let mut sink = JsonFileSink::new(&path);

        sink.write(&sample_corpus()).unwrap();
        let first = fs::read(&path).unwrap();

        let mut bigger = sample_corpus();
        bigger.book_mut_or_insert("出埃及記").chapter_mut(1);
        sink.write(&bigger).unwrap();
        let second = fs::read_to_string(&path).unwrap();

        assert_ne!(first, second.as_bytes());
        let value: serde_json::Value = serde_json::from_str(&second).unwrap();
        assert_eq!(value["創世記"]["1"]["1"], "起初，神創造天地。");
        assert!(value["出埃及記"]["1"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_file_sink_creates_parent_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("out.json");
        let mut sink = JsonFileSink::new(&path);

        sink.write(&Corpus::new()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n");
    }

    #[test]
    fn test_failed_checkpoint_not_counted() {
        let mut checkpointer = Checkpointer::new(FailingSink);
        let result = checkpointer.checkpoint(&sample_corpus());

        assert!(matches!(result, Err(SinkError::Io(_))));
        assert_eq!(checkpointer.written(), 0);
    }
}
