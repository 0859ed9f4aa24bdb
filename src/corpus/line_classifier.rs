use regex::Regex;

use super::types::{LineEvent, ParseState};
use crate::config::ParserConfig;
use crate::error::CorpusError;

/// 节首模式：行首数字（含全角数字）、可选空白、其余内容
const VERSE_PATTERN: &str = r"^(\d+)\s*(.*)$";

/// 把数字串转换为节号
///
/// 接受 ASCII 与全角数字（U+FF10..=U+FF19）；其他 Unicode 数字或超出 u32 时返回 None
fn parse_verse_number(digits: &str) -> Option<u32> {
    digits.chars().try_fold(0u32, |acc, c| {
        let c = match c {
            '\u{FF10}'..='\u{FF19}' => char::from(b'0' + (c as u32 - 0xFF10) as u8),
            _ => c,
        };
        let digit = c.to_digit(10)?;
        acc.checked_mul(10)?.checked_add(digit)
    })
}

/// 参考书名及其字符长度
#[derive(Debug, Clone)]
struct Title {
    name: String,
    char_len: usize,
}

/// 行分类器
///
/// 无状态地判断一行是书卷标题、节首还是续行。
/// 节号与"新章从 1 重新开始"之间的歧义交给 HierarchyBuilder，
/// 那里才有当前章已有几节的上下文。
pub struct LineClassifier {
    /// 参考书名列表（保持配置顺序）
    titles: Vec<Title>,
    /// 标题行允许超出书名的字符数
    title_slack: usize,
    /// 纯数字行短于此长度视为页码
    page_number_max_len: usize,
    verse_pattern: Regex,
}

impl LineClassifier {
    /// 根据配置创建分类器
    ///
    /// 配置不合法时返回错误
    pub fn from_config(config: &ParserConfig) -> Result<Self, CorpusError> {
        config.validate()?;
        let verse_pattern =
            Regex::new(VERSE_PATTERN).map_err(|e| CorpusError::Config(e.to_string()))?;

        let titles = config
            .titles
            .iter()
            .map(|t| {
                let name = t.trim().to_string();
                let char_len = name.chars().count();
                Title { name, char_len }
            })
            .collect();

        Ok(Self {
            titles,
            title_slack: config.title_slack,
            page_number_max_len: config.page_number_max_len,
            verse_pattern,
        })
    }

    /// 标题匹配
    ///
    /// 行与书名完全相同，或以书名开头且总长度小于 书名长度 + 余量。
    /// 多个书名都能匹配时取最长者，等长时取列表中靠前者。
    pub fn match_title(&self, line: &str) -> Option<&str> {
        let line = line.trim();
        let line_len = line.chars().count();

        let mut best: Option<&Title> = None;
        for title in &self.titles {
            let matched = line == title.name
                || (line.starts_with(&title.name)
                    && line_len < title.char_len + self.title_slack);
            if matched && best.map_or(true, |b| title.char_len > b.char_len) {
                best = Some(title);
            }
        }

        best.map(|t| t.name.as_str())
    }

    /// 对单行分类
    ///
    /// # 参数
    /// - `line`: 一行文本
    /// - `state`: 当前解析状态（只读，用于抑制重复页眉）
    pub fn classify(&self, line: &str, state: &ParseState) -> LineEvent {
        let line = line.trim();
        if line.is_empty() {
            return LineEvent::Ignorable;
        }

        if let Some(title) = self.match_title(line) {
            // 每页重复的页眉不应重新打开同一卷
            if state.is_current_book(title) {
                return LineEvent::Ignorable;
            }
            return LineEvent::TitleDetected {
                book_name: title.to_string(),
            };
        }

        if let Some(caps) = self.verse_pattern.captures(line) {
            let content = caps.get(2).map_or("", |m| m.as_str()).trim();

            if content.is_empty() && line.chars().count() < self.page_number_max_len {
                return LineEvent::Ignorable;
            }

            // 超出 u32 的数字串不可能是节号，按续行处理
            if let Some(number) = parse_verse_number(&caps[1]) {
                return LineEvent::VerseStart {
                    number,
                    content: content.to_string(),
                };
            }
        }

        LineEvent::Continuation {
            content: line.to_string(),
        }
    }
}
