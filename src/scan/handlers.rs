//! 聚合区域处理器
//!
//! 宿主有时把"观看次数"或"发布日期"渲染成一个多文本段的容器而不是
//! 每项指标一个文本节点。这三个处理器各自定位容器、拼接内部文本段、
//! 对拼接结果分类，并把样式应用到每个组成段上。容器内容可能被原地
//! 替换而容器身份不变，因此处理器不经过 ProcessedSet 闸门。

use markup5ever_rcdom::Handle;

use super::{apply_classification, parse_or_warn, PassContext};
use crate::dom::node::{create_span, replace_children};
use crate::dom::query::{query_selector, query_selector_all};
use crate::dom::style::set_style_property;
use crate::dom::text::{extract_normalized_text, normalize_whitespace, text_content};
use crate::pipeline::classifier::classify_phrase;
use crate::pipeline::locale::add_views_keyword_if_needed;
use crate::pipeline::splitter::{split_phrases, SplitPhrases};
use super::selectors::{
    DATE_TEXT_FALLBACK, DATE_TEXT_SELECTOR, VIDEOWALL_SELECTORS, VIEW_COUNT_FALLBACK,
    VIEW_COUNT_SELECTOR,
};

fn find_container(document: &Handle, primary: &str, fallback: &str) -> Option<Handle> {
    parse_or_warn(primary)
        .and_then(|list| query_selector(document, &list))
        .or_else(|| parse_or_warn(fallback).and_then(|list| query_selector(document, &list)))
}

/// 播放页观看次数容器
pub fn colorize_view_count(ctx: &mut PassContext<'_>) -> usize {
    let Some(container) =
        find_container(&ctx.dom.document, VIEW_COUNT_SELECTOR, VIEW_COUNT_FALLBACK)
    else {
        return 0;
    };

    let mut writes = 0;

    // 主文本段取容器内最后一个 yt-formatted-string；上下文隐含观看
    // 次数，无条件补观看锚点再分类
    if let Some(list) = parse_or_warn("yt-formatted-string") {
        let strings = query_selector_all(&container, &list);
        if let Some(text_span) = strings.last() {
            let text = normalize_whitespace(&text_content(text_span));
            if !text.is_empty() {
                let with_anchor = format!("{} {}", text, ctx.keywords.views_anchor());
                let result = classify_phrase(&with_anchor, Some(ctx.keywords), ctx.limits);
                if apply_classification(ctx, text_span, result) {
                    writes += 1;
                }
            }
        }
    }

    // 含观看关键字的内部 span 再细化着色
    if let Some(list) = parse_or_warn("yt-formatted-string span") {
        for span in query_selector_all(&container, &list) {
            let text = extract_normalized_text(&span);
            if text.is_empty() || !ctx.keywords.contains_views_keyword(&text.to_lowercase()) {
                continue;
            }
            let text = add_views_keyword_if_needed(&text, ctx.keywords);
            let result = classify_phrase(&text, Some(ctx.keywords), ctx.limits);
            if apply_classification(ctx, &span, result) {
                writes += 1;
            }
        }
    }

    writes
}

/// 播放页发布日期容器
pub fn colorize_date_text(ctx: &mut PassContext<'_>) -> usize {
    let Some(container) =
        find_container(&ctx.dom.document, DATE_TEXT_SELECTOR, DATE_TEXT_FALLBACK)
    else {
        return 0;
    };

    let mut writes = 0;

    // 拼接全部文本段分类，再把同一样式应用到每个非空段
    if let Some(list) = parse_or_warn("yt-formatted-string") {
        let elements = query_selector_all(&container, &list);
        let joined = normalize_whitespace(
            &elements
                .iter()
                .map(text_content)
                .collect::<Vec<_>>()
                .concat(),
        );
        if !joined.is_empty() {
            let result = classify_phrase(&joined, Some(ctx.keywords), ctx.limits);
            for element in &elements {
                if text_content(element).trim().is_empty() {
                    continue;
                }
                if apply_classification(ctx, element, result) {
                    writes += 1;
                }
            }
        }
    }

    // 含时间关键字的内部 span 再细化着色
    if let Some(list) = parse_or_warn("yt-formatted-string span") {
        for span in query_selector_all(&container, &list) {
            let text = extract_normalized_text(&span);
            if text.is_empty() || !ctx.keywords.contains_age_keyword(&text.to_lowercase()) {
                continue;
            }
            let result = classify_phrase(&text, Some(ctx.keywords), ctx.limits);
            if apply_classification(ctx, &span, result) {
                writes += 1;
            }
        }
    }

    writes
}

/// 把组合字符串物化成 观看 / 分隔符 / 日期 三个子 span 并分别着色
///
/// 分隔符 span 复用命中的分隔符原文；锚点拆分没有分隔符原文时用默认
/// 的圆点。
fn materialize_spans(ctx: &mut PassContext<'_>, container: &Handle, split: &SplitPhrases) -> usize {
    let separator_text = split.separator.as_deref().unwrap_or(" \u{2022} ");
    let views_span = create_span(ctx.dom, &split.left);
    let separator_span = create_span(ctx.dom, separator_text);
    set_style_property(&separator_span, "margin", "0 4px");
    let date_span = create_span(ctx.dom, &split.right);
    replace_children(
        container,
        vec![views_span.clone(), separator_span, date_span.clone()],
    );

    let mut writes = 0;
    let views_result = classify_phrase(
        &add_views_keyword_if_needed(&split.left, ctx.keywords),
        Some(ctx.keywords),
        ctx.limits,
    );
    if apply_classification(ctx, &views_span, views_result) {
        writes += 1;
    }
    let date_result = classify_phrase(&split.right, Some(ctx.keywords), ctx.limits);
    if apply_classification(ctx, &date_span, date_result) {
        writes += 1;
    }
    writes
}

/// 推荐卡片：观看与日期常被渲染成同一个字符串
///
/// 依次尝试：已拆分的子 span 原地分类；分隔符或锚点位置拆分并物化
/// 子 span；最后整体着色。
pub fn colorize_videowall(ctx: &mut PassContext<'_>) -> usize {
    let mut containers = Vec::new();
    for selector in VIDEOWALL_SELECTORS {
        let Some(list) = parse_or_warn(selector) else {
            continue;
        };
        let found = query_selector_all(&ctx.dom.document, &list);
        if !found.is_empty() {
            containers = found;
            break;
        }
    }

    let span_list = parse_or_warn("span");
    let mut writes = 0;
    for container in containers {
        let text = extract_normalized_text(&container);
        if text.is_empty() {
            continue;
        }

        // 已经拆分过：逐个重新分类，内容被原地替换时也能收敛
        if let Some(list) = &span_list {
            let existing = query_selector_all(&container, list);
            if !existing.is_empty() {
                for span in existing {
                    let text = extract_normalized_text(&span);
                    if text.is_empty() {
                        continue;
                    }
                    let text = add_views_keyword_if_needed(&text, ctx.keywords);
                    let result = classify_phrase(&text, Some(ctx.keywords), ctx.limits);
                    if apply_classification(ctx, &span, result) {
                        writes += 1;
                    }
                }
                continue;
            }
        }

        // 分隔符拆分，退而求其次按锚点位置拆分
        if let Some(split) = split_phrases(&text, ctx.keywords) {
            writes += materialize_spans(ctx, &container, &split);
            continue;
        }

        let result = classify_phrase(&text, Some(ctx.keywords), ctx.limits);
        if apply_classification(ctx, &container, result) {
            writes += 1;
        }
    }
    writes
}
