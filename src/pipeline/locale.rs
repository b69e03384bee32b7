//! 语言关键字提供者
//!
//! 把宿主文档声明的语言解析为两张固定关键字表之一；不支持的语言返回
//! `None`，下游分类全部降级为无分类而不是报错。每次导航只派生一次，
//! 在导航生命周期内不可变。

use markup5ever_rcdom::Handle;

use crate::dom::node::{get_node_attr, get_root_element};

/// 受支持的宿主语言
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    French,
}

// 时间关键字表：[锚点, 日, 周, 月, 年]
const AGE_KEYWORDS_EN: [&str; 5] = ["ago", "day", "week", "month", "year"];
const AGE_KEYWORDS_FR: [&str; 5] = ["il y a", "jour", "semaine", "mois", "an"];

// 观看次数关键字表：[锚点, 千, 百万, 十亿]
const VIEWS_KEYWORDS_EN: [&str; 4] = ["views", "k views", "m views", "b views"];
const VIEWS_KEYWORDS_FR: [&str; 4] = ["vues", "k vues", "m de vues", "md de vues"];

/// 一次导航期间固定的语言关键字表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleKeywordSet {
    pub language: Language,
    age_markers: [&'static str; 5],
    views_markers: [&'static str; 4],
}

impl LocaleKeywordSet {
    /// 返回指定语言的关键字表
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::English => Self {
                language,
                age_markers: AGE_KEYWORDS_EN,
                views_markers: VIEWS_KEYWORDS_EN,
            },
            Language::French => Self {
                language,
                age_markers: AGE_KEYWORDS_FR,
                views_markers: VIEWS_KEYWORDS_FR,
            },
        }
    }

    /// 时间锚点（"ago" / "il y a"）
    pub fn age_anchor(&self) -> &'static str {
        self.age_markers[0]
    }

    pub fn day(&self) -> &'static str {
        self.age_markers[1]
    }

    pub fn week(&self) -> &'static str {
        self.age_markers[2]
    }

    pub fn month(&self) -> &'static str {
        self.age_markers[3]
    }

    pub fn year(&self) -> &'static str {
        self.age_markers[4]
    }

    /// 观看锚点（"views" / "vues"）
    pub fn views_anchor(&self) -> &'static str {
        self.views_markers[0]
    }

    pub fn views_thousands(&self) -> &'static str {
        self.views_markers[1]
    }

    pub fn views_millions(&self) -> &'static str {
        self.views_markers[2]
    }

    pub fn views_billions(&self) -> &'static str {
        self.views_markers[3]
    }

    /// 小写文本是否包含任一时间关键字
    pub fn contains_age_keyword(&self, lower: &str) -> bool {
        self.age_markers.iter().any(|kw| lower.contains(kw))
    }

    /// 小写文本是否包含任一观看次数关键字
    pub fn contains_views_keyword(&self, lower: &str) -> bool {
        self.views_markers.iter().any(|kw| lower.contains(kw))
    }
}

/// 从文档根元素的 `lang` 属性检测语言
pub fn detect_language(document: &Handle) -> Option<Language> {
    let root = get_root_element(document)?;
    match get_node_attr(&root, "lang")?.as_str() {
        "en" | "en-US" => Some(Language::English),
        "fr" | "fr-FR" => Some(Language::French),
        _ => None,
    }
}

/// 检测文档语言并返回对应关键字表
pub fn detect_keyword_set(document: &Handle) -> Option<LocaleKeywordSet> {
    detect_language(document).map(LocaleKeywordSet::for_language)
}

/// 上下文隐含观看次数而文本自身缺少关键字时，补充观看锚点
pub fn add_views_keyword_if_needed(text: &str, keywords: &LocaleKeywordSet) -> String {
    let lower = text.to_lowercase();
    if keywords.contains_views_keyword(&lower) {
        text.to_string()
    } else {
        format!("{} {}", text, keywords.views_anchor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse::html_to_dom;

    fn detect(html: &str) -> Option<Language> {
        let dom = html_to_dom(html.as_bytes(), "utf-8");
        detect_language(&dom.document)
    }

    #[test]
    fn test_detect_supported_languages() {
        assert_eq!(detect("<html lang=\"en\"></html>"), Some(Language::English));
        assert_eq!(
            detect("<html lang=\"en-US\"></html>"),
            Some(Language::English)
        );
        assert_eq!(detect("<html lang=\"fr\"></html>"), Some(Language::French));
        assert_eq!(
            detect("<html lang=\"fr-FR\"></html>"),
            Some(Language::French)
        );
    }

    #[test]
    fn test_unsupported_language_yields_none() {
        assert_eq!(detect("<html lang=\"de\"></html>"), None);
        assert_eq!(detect("<html lang=\"en-GB\"></html>"), None);
        assert_eq!(detect("<html></html>"), None);
    }

    #[test]
    fn test_add_views_keyword_if_needed() {
        let keywords = LocaleKeywordSet::for_language(Language::English);
        assert_eq!(add_views_keyword_if_needed("12 K", &keywords), "12 K views");
        assert_eq!(
            add_views_keyword_if_needed("12K views", &keywords),
            "12K views"
        );

        let keywords = LocaleKeywordSet::for_language(Language::French);
        assert_eq!(
            add_views_keyword_if_needed("1,2 M", &keywords),
            "1,2 M vues"
        );
    }
}
