//! 分类流水线
//!
//! 从规范化短语到最终样式记录的纯逻辑部分：
//!
//! - `locale`: 宿主语言检测与关键字表
//! - `splitter`: 组合短语拆分（"12K views • 3 days ago"）
//! - `classifier`: 时间/观看次数分类与误报拒绝
//! - `palette`: 主题感知的调色板解析与覆盖
//! - `cache`: 节点身份键控的弱引用缓存（StyleCache / ProcessedSet）

pub mod cache;
pub mod classifier;
pub mod locale;
pub mod palette;
pub mod splitter;

// 重新导出主要的公共 API
pub use cache::{ProcessedSet, StyleCache, StyleRecord};
pub use classifier::{
    classify_phrase, AgeBucket, Category, ClassificationResult, FontWeight, PhraseLimits,
    ViewsBucket,
};
pub use locale::{detect_keyword_set, detect_language, Language, LocaleKeywordSet};
pub use palette::{detect_theme, OverrideScope, PaletteResolver, Theme};
pub use splitter::{split_at_anchors, split_at_separator, split_phrases, SplitPhrases};
