//! # QuickView 引擎
//!
//! 在持续变动的 HTML 文档树中定位"相对时间"（"3 days ago" / "il y a 3 jours"）
//! 与"观看次数"（"12K views" / "12k vues"）文本片段，将其分类到配色桶，
//! 并按主题感知的调色板应用展示样式。
//!
//! 引擎是增量收敛的：未变化的节点不会被重复处理，样式写入只在解析结果
//! 发生变化时才触碰 DOM，外部渲染器以任意节奏重写文档树时，防抖/节流
//! 调度器把突发变更合并为幂等的扫描趟。
//!
//! ## 模块组织
//!
//! - `core` - 引擎核心、上下文与配置选项
//! - `dom` - DOM 解析、选择器查询、文本提取与内联样式写入
//! - `pipeline` - 语言关键字、短语拆分、分类、调色板与节点缓存
//! - `scan` - 扫描编排、选择器目录与调度
//! - `messages` - 跨上下文消息通道

pub mod core;
pub mod dom;
pub mod messages;
pub mod pipeline;
pub mod scan;

// Re-export commonly used items for convenience
pub use crate::core::{EngineError, EngineOptions, EngineResult, QuickViewEngine};
pub use crate::messages::{Message, MessageResponse};
pub use crate::pipeline::classifier::{
    AgeBucket, Category, ClassificationResult, FontWeight, PhraseLimits, ViewsBucket,
};
pub use crate::pipeline::locale::{Language, LocaleKeywordSet};
pub use crate::pipeline::palette::{OverrideScope, Theme};
pub use crate::scan::scheduler::{ScanScheduler, ScanTrigger};
