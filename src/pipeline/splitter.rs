//! 组合短语拆分
//!
//! 聚合容器里常见 "12K views • 3 days ago" 这类把观看次数和时间拼在
//! 一行的文本。先按首个分隔符（• 或 ·）拆分；没有分隔符时，若观看
//! 锚点严格位于时间锚点之前，则紧贴时间锚点前切开；都不成立时返回
//! `None`，调用方把整段当作单一短语处理。

use std::sync::OnceLock;

use regex::Regex;

use super::locale::LocaleKeywordSet;
use crate::dom::text::normalize_whitespace;

/// 拆分结果：左右两个短语与命中的分隔符原文
///
/// 按锚点拆分时没有分隔符原文，`separator` 为 `None`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPhrases {
    pub left: String,
    pub right: String,
    pub separator: Option<String>,
}

fn separator_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\s+[\u{2022}\u{00B7}]\s+").unwrap_or_else(|_| Regex::new(r"").unwrap())
    })
}

/// ASCII 大小写不敏感子串查找，返回字节偏移
fn find_ascii_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

/// 按首个分隔符拆分，保留命中的分隔符原文；两侧任一为空则视为无分隔符
pub fn split_at_separator(text: &str) -> Option<SplitPhrases> {
    let found = separator_pattern().find(text)?;
    let left = text[..found.start()].trim();
    let right = text[found.end()..].trim();
    if left.is_empty() || right.is_empty() {
        return None;
    }
    Some(SplitPhrases {
        left: left.to_string(),
        right: right.to_string(),
        separator: Some(found.as_str().to_string()),
    })
}

/// 按锚点位置拆分为（观看部分, 时间部分）
///
/// 两个锚点都出现、且观看锚点严格在前时，紧贴时间锚点（"ago" /
/// "il y a"）之前切开。锚点位于开头说明整段就是时间短语，不拆。
pub fn split_at_anchors(text: &str, keywords: &LocaleKeywordSet) -> Option<SplitPhrases> {
    let views_idx = find_ascii_case_insensitive(text, keywords.views_anchor())?;
    let age_idx = find_ascii_case_insensitive(text, keywords.age_anchor())?;
    if age_idx == 0 || views_idx >= age_idx {
        return None;
    }

    let left = text[..age_idx].trim();
    let right = text[age_idx..].trim();
    if left.is_empty() || right.is_empty() {
        return None;
    }
    Some(SplitPhrases {
        left: left.to_string(),
        right: right.to_string(),
        separator: None,
    })
}

/// 把聚合文本拆成两个独立短语；无法拆分时返回 `None`
pub fn split_phrases(text: &str, keywords: &LocaleKeywordSet) -> Option<SplitPhrases> {
    let text = normalize_whitespace(text);
    if text.is_empty() {
        return None;
    }
    split_at_separator(&text).or_else(|| split_at_anchors(&text, keywords))
}
