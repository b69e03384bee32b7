//! 扫描编排
//!
//! 一趟扫描 = 通用选择器目录 + 三个聚合区域处理器，全部同步执行且
//! 幂等。目录条目按固定优先级处理，单条失败（无效选择器）记录后跳过；
//! 聚合处理器总在通用趟之后运行，同一节点两边都命中时以聚合结果为准。

pub mod handlers;
pub mod scheduler;
pub mod selectors;

pub use scheduler::{ScanScheduler, ScanTrigger};

use markup5ever_rcdom::{Handle, RcDom};
use tracing::{debug, warn};

use crate::dom::node::get_node_attr;
use crate::dom::query::{query_selector_all, SelectorList};
use crate::dom::style::set_style_property;
use crate::dom::text::extract_normalized_text;
use crate::pipeline::cache::{ProcessedSet, StyleCache, StyleRecord};
use crate::pipeline::classifier::{classify_phrase, ClassificationResult, PhraseLimits};
use crate::pipeline::locale::{add_views_keyword_if_needed, LocaleKeywordSet};
use crate::pipeline::palette::PaletteSnapshot;
use selectors::{SelectorEntry, AGGREGATE_CONTAINER_IDS, SELECTOR_ENTRIES};

/// 一趟扫描所需的全部可变状态与只读输入
pub struct PassContext<'a> {
    pub dom: &'a RcDom,
    pub keywords: &'a LocaleKeywordSet,
    pub snapshot: &'a PaletteSnapshot,
    pub limits: PhraseLimits,
    pub styles: &'a mut StyleCache,
    pub processed: &'a mut ProcessedSet,
}

/// 解析失败时记录并返回 `None`，调用方跳过该选择器
pub(crate) fn parse_or_warn(selector: &str) -> Option<SelectorList> {
    match SelectorList::parse(selector) {
        Ok(list) => Some(list),
        Err(err) => {
            warn!(selector, %err, "跳过无效选择器");
            None
        }
    }
}

/// 把分类结果写到节点上；与缓存一致时零写入
pub(crate) fn apply_classification(
    ctx: &mut PassContext<'_>,
    node: &Handle,
    result: ClassificationResult,
) -> bool {
    let Some(category) = result.category else {
        return false;
    };
    let record = StyleRecord {
        category,
        weight: result.weight,
        color: ctx.snapshot.color_of(category).to_string(),
    };
    if ctx.styles.get(node) == Some(&record) {
        return false;
    }
    set_style_property(node, "color", &record.color);
    set_style_property(node, "font-weight", record.weight.as_css());
    ctx.styles.insert(node, record);
    true
}

fn parent_of(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take();
    let parent = weak.as_ref().and_then(|w| w.upgrade());
    node.parent.set(weak);
    parent
}

/// 节点是否位于聚合处理器独占的容器内
fn in_aggregate_container(node: &Handle) -> bool {
    let mut current = parent_of(node);
    while let Some(ancestor) = current {
        if let Some(id) = get_node_attr(&ancestor, "id") {
            if AGGREGATE_CONTAINER_IDS.contains(&id.as_str()) {
                return true;
            }
        }
        current = parent_of(&ancestor);
    }
    false
}

/// 主选择器无匹配时查候补
fn query_entry(document: &Handle, entry: &SelectorEntry) -> Option<Vec<Handle>> {
    let list = parse_or_warn(entry.primary)?;
    let found = query_selector_all(document, &list);
    if !found.is_empty() {
        return Some(found);
    }
    let fallback = entry.fallback?;
    let list = parse_or_warn(fallback)?;
    Some(query_selector_all(document, &list))
}

fn process_entry(ctx: &mut PassContext<'_>, entry: &SelectorEntry) -> usize {
    let Some(nodes) = query_entry(&ctx.dom.document, entry) else {
        return 0;
    };

    let mut writes = 0;
    for node in nodes {
        if entry.options.use_processed_gate && ctx.processed.contains(&node) {
            continue;
        }
        if in_aggregate_container(&node) {
            continue;
        }

        let text = extract_normalized_text(&node);
        if text.is_empty() {
            continue;
        }

        let lower = text.to_lowercase();
        let has_views = ctx.keywords.contains_views_keyword(&lower);
        if entry.options.require_keyword
            && !has_views
            && !ctx.keywords.contains_age_keyword(&lower)
        {
            continue;
        }

        let text = if entry.options.append_views_keyword && has_views {
            add_views_keyword_if_needed(&text, ctx.keywords)
        } else {
            text
        };

        let result = classify_phrase(&text, Some(ctx.keywords), ctx.limits);
        if apply_classification(ctx, &node, result) {
            writes += 1;
        }
        if entry.options.use_processed_gate {
            ctx.processed.insert(&node);
        }
    }
    writes
}

/// 执行一趟完整扫描，返回实际发生的 DOM 写入数
pub fn run_scan_pass(ctx: &mut PassContext<'_>) -> usize {
    ctx.styles.sweep();
    ctx.processed.sweep();

    let mut writes = 0;
    for entry in SELECTOR_ENTRIES {
        writes += process_entry(ctx, entry);
    }

    // 聚合处理器在通用趟之后运行，可覆盖通用趟的结果
    writes += handlers::colorize_view_count(ctx);
    writes += handlers::colorize_date_text(ctx);
    writes += handlers::colorize_videowall(ctx);

    debug!(writes, processed = ctx.processed.len(), "扫描趟完成");
    writes
}
