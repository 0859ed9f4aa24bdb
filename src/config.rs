use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::CorpusError;

/// 和合本（繁体）六十六卷书名
///
/// 此处顺序即经卷的正典顺序。若某书名是另一书名的前缀，
/// 分类器按最长匹配处理，不依赖列表顺序。
pub const DEFAULT_TITLES: [&str; 66] = [
    "創世記", "出埃及記", "利未記", "民數記", "申命記", "約書亞記", "士師記", "路得記",
    "撒母耳記上", "撒母耳記下", "列王紀上", "列王紀下", "歷代志上", "歷代志下",
    "以斯拉記", "尼希米記", "以斯帖記", "約伯記", "詩篇", "箴言", "傳道書", "雅歌",
    "以賽亞書", "耶利米書", "耶利米哀歌", "以西結書", "但以理書", "何西阿書", "約珥書",
    "阿摩司書", "俄巴底亞書", "約拿書", "彌迦書", "那鴻書", "哈巴谷書", "西番雅書",
    "哈該書", "撒迦利亞書", "瑪拉基書",
    "馬太福音", "馬可福音", "路加福音", "約翰福音", "使徒行傳", "羅馬書", "哥林多前書",
    "哥林多後書", "加拉太書", "以弗所書", "腓立比書", "歌羅西書", "帖撒羅尼迦前書",
    "帖撒羅尼迦後書", "提摩太前書", "提摩太後書", "提多書", "腓利門書", "希伯來書",
    "雅各書", "彼得前書", "彼得後書", "約翰一書", "約翰二書", "約翰三書", "猶大書",
    "啟示錄",
];

/// 标题行允许的额外字符数（如 "創世記 Genesis" 这类带外文注释的标题）
pub const DEFAULT_TITLE_SLACK: usize = 5;

/// 纯数字行短于此长度时视为页码
pub const DEFAULT_PAGE_NUMBER_MAX_LEN: usize = 5;

/// 解析配置
///
/// 所有字段都有默认值，配置文件只需写出要覆盖的部分
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// 书名参考列表
    pub titles: Vec<String>,
    /// 标题匹配的长度余量
    pub title_slack: usize,
    /// 页码判定阈值
    pub page_number_max_len: usize,
    /// 日志级别（RUST_LOG 未设置时使用）
    pub log_level: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            titles: DEFAULT_TITLES.iter().map(|t| t.to_string()).collect(),
            title_slack: DEFAULT_TITLE_SLACK,
            page_number_max_len: DEFAULT_PAGE_NUMBER_MAX_LEN,
            log_level: "info".to_string(),
        }
    }
}

impl ParserConfig {
    /// 从 TOML 文件加载配置
    pub fn from_file(path: &Path) -> Result<Self, CorpusError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| CorpusError::Config(format!("读取配置文件 {:?} 失败: {}", path, e)))?;
        Self::from_toml(&raw)
    }

    /// 解析 TOML 文本并校验
    pub fn from_toml(raw: &str) -> Result<Self, CorpusError> {
        let config: ParserConfig =
            toml::from_str(raw).map_err(|e| CorpusError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置
    ///
    /// 书名列表不能为空，也不能含空白书名（空书名会匹配任意行）
    pub fn validate(&self) -> Result<(), CorpusError> {
        if self.titles.is_empty() {
            return Err(CorpusError::Config("书名列表为空".to_string()));
        }
        if let Some(pos) = self.titles.iter().position(|t| t.trim().is_empty()) {
            return Err(CorpusError::Config(format!("第 {} 个书名为空", pos + 1)));
        }
        Ok(())
    }
}
