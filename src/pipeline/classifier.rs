//! 短语分类器
//!
//! 纯函数：规范化短语 + 关键字表 → 分类结果。时间分类优先于观看次数；
//! 形状/长度启发式拒绝只是"顺带提到时间词"的叙述性文本。

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::locale::{Language, LocaleKeywordSet};

/// 时间桶
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeBucket {
    /// 锚点命中但无单位关键字（小时/分钟级）
    Default,
    Day,
    Week,
    Month,
    Year1To3,
    Year3Plus,
}

/// 观看次数桶
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewsBucket {
    Thousands,
    Millions,
    Billions,
}

/// 九个调色板类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Age(AgeBucket),
    Views(ViewsBucket),
}

impl Category {
    /// 全部九个类别，调色板与清理逻辑按此遍历
    pub const ALL: [Category; 9] = [
        Category::Age(AgeBucket::Default),
        Category::Age(AgeBucket::Day),
        Category::Age(AgeBucket::Week),
        Category::Age(AgeBucket::Month),
        Category::Age(AgeBucket::Year1To3),
        Category::Age(AgeBucket::Year3Plus),
        Category::Views(ViewsBucket::Thousands),
        Category::Views(ViewsBucket::Millions),
        Category::Views(ViewsBucket::Billions),
    ];

    /// 根元素上的 CSS 自定义属性名
    pub fn css_var(&self) -> &'static str {
        match self {
            Category::Age(AgeBucket::Default) => "--quick-view-date-default",
            Category::Age(AgeBucket::Day) => "--quick-view-date-day",
            Category::Age(AgeBucket::Week) => "--quick-view-date-week",
            Category::Age(AgeBucket::Month) => "--quick-view-date-month",
            Category::Age(AgeBucket::Year1To3) => "--quick-view-date-year-1-3",
            Category::Age(AgeBucket::Year3Plus) => "--quick-view-date-year-3-plus",
            Category::Views(ViewsBucket::Thousands) => "--quick-view-views-k",
            Category::Views(ViewsBucket::Millions) => "--quick-view-views-m",
            Category::Views(ViewsBucket::Billions) => "--quick-view-views-md",
        }
    }

    /// 配置层使用的存储键
    pub fn storage_key(&self) -> &'static str {
        match self {
            Category::Age(AgeBucket::Default) => "date-default",
            Category::Age(AgeBucket::Day) => "date-day",
            Category::Age(AgeBucket::Week) => "date-week",
            Category::Age(AgeBucket::Month) => "date-month",
            Category::Age(AgeBucket::Year1To3) => "date-year-1-3",
            Category::Age(AgeBucket::Year3Plus) => "date-year-3-plus",
            Category::Views(ViewsBucket::Thousands) => "views-k",
            Category::Views(ViewsBucket::Millions) => "views-m",
            Category::Views(ViewsBucket::Billions) => "views-md",
        }
    }

    /// 由存储键反查类别
    pub fn from_storage_key(key: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|category| category.storage_key() == key)
    }
}

/// 字重
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
}

impl FontWeight {
    pub fn as_css(&self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        }
    }
}

/// 分类结果：类别与字重的不可变值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationResult {
    pub category: Option<Category>,
    pub weight: FontWeight,
}

impl ClassificationResult {
    /// 无分类
    pub const NONE: ClassificationResult = ClassificationResult {
        category: None,
        weight: FontWeight::Normal,
    };
}

/// 短语长度阈值
///
/// 数值来自产品中的经验调优（严格 50 / 宽松 30），按原样保留为可配置
/// 常量，不引申更严或更宽的意图。以 Unicode 标量计数。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhraseLimits {
    /// 时间短语的硬上限
    pub strict_max_chars: usize,
    /// 未命中严格形状模式时的宽松上限
    pub loose_max_chars: usize,
}

impl Default for PhraseLimits {
    fn default() -> Self {
        Self {
            strict_max_chars: 50,
            loose_max_chars: 30,
        }
    }
}

/// "数字 + 时间单位 (+ 锚点)" 的严格形状模式
fn strict_age_pattern(language: Language) -> &'static Regex {
    static PATTERN_EN: OnceLock<Regex> = OnceLock::new();
    static PATTERN_FR: OnceLock<Regex> = OnceLock::new();
    match language {
        Language::English => PATTERN_EN.get_or_init(|| {
            Regex::new(r"(\d+)\s+(day|week|month|year|hour|minute|second)\s+ago")
                .unwrap_or_else(|_| Regex::new(r"").unwrap())
        }),
        Language::French => PATTERN_FR.get_or_init(|| {
            Regex::new(r"il\s+y\s+a\s+(\d+)\s+(jour|semaine|mois|an|heure|minute|second)")
                .unwrap_or_else(|_| Regex::new(r"").unwrap())
        }),
    }
}

fn leading_integer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+)").unwrap_or_else(|_| Regex::new(r"").unwrap()))
}

/// 年桶的边界：短语中首个整数 > 3 则视为 3 年以上
fn year_bucket(lower: &str) -> AgeBucket {
    let years = leading_integer_pattern()
        .captures(lower)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok());
    match years {
        Some(years) if years > 3 => AgeBucket::Year3Plus,
        _ => AgeBucket::Year1To3,
    }
}

fn classify_age(
    text: &str,
    keywords: &LocaleKeywordSet,
    limits: PhraseLimits,
) -> Option<ClassificationResult> {
    let lower = text.to_lowercase();
    if !lower.contains(keywords.age_anchor()) {
        return None;
    }

    // 长度守卫：超长文本是叙述性内容，即便包含锚点也拒绝
    let char_count = text.chars().count();
    if char_count > limits.strict_max_chars {
        return None;
    }
    if !strict_age_pattern(keywords.language).is_match(&lower)
        && char_count > limits.loose_max_chars
    {
        return None;
    }

    // 固定优先顺序：日 → 周 → 月 → 年
    let bucket = if lower.contains(keywords.day()) {
        AgeBucket::Day
    } else if lower.contains(keywords.week()) {
        AgeBucket::Week
    } else if lower.contains(keywords.month()) {
        AgeBucket::Month
    } else if lower.contains(keywords.year()) {
        year_bucket(&lower)
    } else {
        AgeBucket::Default
    };

    Some(ClassificationResult {
        category: Some(Category::Age(bucket)),
        weight: FontWeight::Normal,
    })
}

fn classify_views(text: &str, keywords: &LocaleKeywordSet) -> Option<ClassificationResult> {
    let lower = text.to_lowercase();
    if !lower.contains(keywords.views_anchor()) {
        return None;
    }

    let clean = crate::dom::text::normalize_whitespace(&lower);

    // 从最高位单位开始检查，"12M views" 不得落入更宽的回退
    let (bucket, weight) = if clean.contains(keywords.views_billions()) {
        (ViewsBucket::Billions, FontWeight::Bold)
    } else if clean.contains(keywords.views_millions()) {
        (ViewsBucket::Millions, FontWeight::Normal)
    } else if clean.contains(keywords.views_thousands()) {
        (ViewsBucket::Thousands, FontWeight::Normal)
    } else {
        // 锚点命中但无量级子关键字
        return None;
    };

    Some(ClassificationResult {
        category: Some(Category::Views(bucket)),
        weight,
    })
}

/// 将规范化短语映射为分类结果
///
/// 关键字表缺失（不支持的语言）时恒为无分类。时间分类优先：短语同时
/// 包含观看关键字时仍按时间着色，观看分类只在时间分类不适用时尝试。
pub fn classify_phrase(
    text: &str,
    keywords: Option<&LocaleKeywordSet>,
    limits: PhraseLimits,
) -> ClassificationResult {
    let Some(keywords) = keywords else {
        return ClassificationResult::NONE;
    };

    if let Some(result) = classify_age(text, keywords, limits) {
        return result;
    }
    if let Some(result) = classify_views(text, keywords) {
        return result;
    }
    ClassificationResult::NONE
}
