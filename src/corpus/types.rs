use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

/// 章：节号 → 经文
///
/// 序列化时节号写成十进制字符串键
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct Chapter {
    verses: BTreeMap<u32, String>,
}

impl Chapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verse(&self, number: u32) -> Option<&str> {
        self.verses.get(&number).map(|s| s.as_str())
    }

    /// 写入一节，同号覆盖（后写者胜）
    pub fn set_verse(&mut self, number: u32, content: String) {
        self.verses.insert(number, content);
    }

    /// 在已有节末尾直接拼接，不插入任何分隔符
    ///
    /// 节不存在时返回 false
    pub fn append_to_verse(&mut self, number: u32, content: &str) -> bool {
        match self.verses.get_mut(&number) {
            Some(text) => {
                text.push_str(content);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    pub fn verses(&self) -> impl Iterator<Item = (u32, &str)> {
        self.verses.iter().map(|(n, t)| (*n, t.as_str()))
    }
}

/// 卷：章号 → 章
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct Book {
    chapters: BTreeMap<u32, Chapter>,
}

impl Book {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chapter(&self, number: u32) -> Option<&Chapter> {
        self.chapters.get(&number)
    }

    pub(crate) fn chapter_mut(&mut self, number: u32) -> &mut Chapter {
        self.chapters.entry(number).or_default()
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    pub fn chapters(&self) -> impl Iterator<Item = (u32, &Chapter)> {
        self.chapters.iter().map(|(n, c)| (*n, c))
    }

    pub fn verse_count(&self) -> usize {
        self.chapters.values().map(Chapter::len).sum()
    }
}

/// 经文语料：书名 → 卷
///
/// 保持书卷首次出现的顺序；运行期间只追加，已关闭的书卷不再回访
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    books: Vec<(String, Book)>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn book(&self, name: &str) -> Option<&Book> {
        self.books.iter().find(|(n, _)| n == name).map(|(_, b)| b)
    }

    /// 取得书卷，不存在时在末尾创建
    pub(crate) fn book_mut_or_insert(&mut self, name: &str) -> &mut Book {
        let pos = match self.books.iter().position(|(n, _)| n == name) {
            Some(pos) => pos,
            None => {
                self.books.push((name.to_string(), Book::new()));
                self.books.len() - 1
            }
        };
        &mut self.books[pos].1
    }

    pub(crate) fn book_mut(&mut self, name: &str) -> Option<&mut Book> {
        self.books.iter_mut().find(|(n, _)| n == name).map(|(_, b)| b)
    }

    /// 按 (卷, 章, 节) 定位经文
    pub fn verse(&self, book: &str, chapter: u32, verse: u32) -> Option<&str> {
        self.book(book)?.chapter(chapter)?.verse(verse)
    }

    pub fn book_names(&self) -> impl Iterator<Item = &str> {
        self.books.iter().map(|(n, _)| n.as_str())
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    pub fn chapter_count(&self) -> usize {
        self.books.iter().map(|(_, b)| b.chapter_count()).sum()
    }

    pub fn verse_count(&self) -> usize {
        self.books.iter().map(|(_, b)| b.verse_count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

impl Serialize for Corpus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.books.len()))?;
        for (name, book) in &self.books {
            map.serialize_entry(name, book)?;
        }
        map.end()
    }
}

/// 解析状态
///
/// 由 HierarchyBuilder 独占，每次运行使用独立实例
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseState {
    /// 当前书卷，None 表示尚未进入任何书卷
    pub current_book: Option<String>,
    /// 当前章号
    pub current_chapter: u32,
    /// 当前节号，0 表示尚未开节（之前的文本丢弃）
    pub current_verse: u32,
}

impl ParseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_current_book(&self, name: &str) -> bool {
        self.current_book.as_deref() == Some(name)
    }
}

/// 单行分类结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// 书卷标题
    TitleDetected { book_name: String },
    /// 以节号开头的行
    VerseStart { number: u32, content: String },
    /// 上一节的续行
    Continuation { content: String },
    /// 空行、页码、重复的页眉
    Ignorable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_append_without_separator() {
        let mut chapter = Chapter::new();
        chapter.set_verse(1, "In the".to_string());
        assert!(chapter.append_to_verse(1, " beginning"));
        assert_eq!(chapter.verse(1), Some("In the beginning"));
        assert!(!chapter.append_to_verse(2, "x"));
    }

    #[test]
    fn test_corpus_preserves_book_order() {
        let mut corpus = Corpus::new();
        corpus.book_mut_or_insert("出埃及記");
        corpus.book_mut_or_insert("創世記");
        corpus.book_mut_or_insert("出埃及記");

        let names: Vec<&str> = corpus.book_names().collect();
        assert_eq!(names, vec!["出埃及記", "創世記"]);
    }

    #[test]
    fn test_corpus_serializes_numeric_keys_as_strings() {
        let mut corpus = Corpus::new();
        let book = corpus.book_mut_or_insert("創世記");
        book.chapter_mut(1).set_verse(1, "起初".to_string());
        book.chapter_mut(1).set_verse(10, "第十節".to_string());
        book.chapter_mut(2);

        let json = serde_json::to_string(&corpus).unwrap();
        assert_eq!(
            json,
            r#"{"創世記":{"1":{"1":"起初","10":"第十節"},"2":{}}}"#
        );
    }

    #[test]
    fn test_corpus_counts_and_lookup() {
        let mut corpus = Corpus::new();
        let book = corpus.book_mut_or_insert("路得記");
        book.chapter_mut(1).set_verse(1, "a".to_string());
        book.chapter_mut(1).set_verse(2, "b".to_string());
        book.chapter_mut(2).set_verse(1, "c".to_string());

        assert_eq!(corpus.book_count(), 1);
        assert_eq!(corpus.chapter_count(), 2);
        assert_eq!(corpus.verse_count(), 3);
        assert_eq!(corpus.verse("路得記", 2, 1), Some("c"));
        assert_eq!(corpus.verse("路得記", 3, 1), None);
        assert_eq!(corpus.verse("雅歌", 1, 1), None);
    }

    #[test]
    fn test_parse_state_default() {
        let state = ParseState::new();
        assert_eq!(state.current_book, None);
        assert_eq!(state.current_chapter, 0);
        assert_eq!(state.current_verse, 0);
        assert!(!state.is_current_book("創世記"));
    }
}
