use std::convert::Infallible;

use super::types::{Corpus, LineEvent, ParseState};

/// Hierarchy Builder
///
/// 持有正在构建的语料与解析状态，按分类结果推进 卷/章/节 游标。
/// 自身从不出错：无法归属的行直接丢弃。
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    corpus: Corpus,
    state: ParseState,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn state(&self) -> &ParseState {
        &self.state
    }

    pub fn into_corpus(self) -> Corpus {
        self.corpus
    }

    /// 应用一个事件，不做检查点
    pub fn apply(&mut self, event: LineEvent) {
        let result: Result<(), Infallible> = self.apply_with_checkpoint(event, |_| Ok(()));
        match result {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    /// 应用一个事件
    ///
    /// 检测到新书卷且已有打开的书卷时，先以当前语料调用 `on_book_closed`，
    /// 再切换书卷。回调的错误原样返回，此时状态尚未改变。
    pub fn apply_with_checkpoint<F, E>(&mut self, event: LineEvent, on_book_closed: F) -> Result<(), E>
    where
        F: FnOnce(&Corpus) -> Result<(), E>,
    {
        match event {
            LineEvent::TitleDetected { book_name } => {
                if let Some(closed) = self.state.current_book.as_deref() {
                    tracing::info!("书卷结束: {}，保存进度", closed);
                    on_book_closed(&self.corpus)?;
                }
                self.open_book(book_name);
            }
            LineEvent::VerseStart { number, content } => self.start_verse(number, content),
            LineEvent::Continuation { content } => self.continue_verse(&content),
            LineEvent::Ignorable => {}
        }
        Ok(())
    }

    fn open_book(&mut self, name: String) {
        tracing::info!("发现书卷: {}", name);
        let book = self.corpus.book_mut_or_insert(&name);
        book.chapter_mut(1);

        self.state.current_book = Some(name);
        self.state.current_chapter = 1;
        self.state.current_verse = 0;
    }

    fn start_verse(&mut self, number: u32, content: String) {
        // 目录、前言等出现在任何书卷之前的内容
        let Some(name) = self.state.current_book.as_deref() else {
            return;
        };
        let Some(book) = self.corpus.book_mut(name) else {
            return;
        };

        // 当前章已有内容时出现节号 1，即视为新章开始
        let chapter_has_content = book
            .chapter(self.state.current_chapter)
            .is_some_and(|c| !c.is_empty());
        if number == 1 && chapter_has_content {
            self.state.current_chapter += 1;
            tracing::debug!("{} 第 {} 章开始", name, self.state.current_chapter);
        }

        self.state.current_verse = number;
        book.chapter_mut(self.state.current_chapter)
            .set_verse(number, content);
    }

    fn continue_verse(&mut self, content: &str) {
        if self.state.current_verse == 0 {
            return;
        }
        let Some(name) = self.state.current_book.as_deref() else {
            return;
        };
        if let Some(book) = self.corpus.book_mut(name) {
            book.chapter_mut(self.state.current_chapter)
                .append_to_verse(self.state.current_verse, content);
        }
    }
}
