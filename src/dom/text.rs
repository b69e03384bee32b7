//! 文本提取器
//!
//! 优先读取"渲染文本"（跳过脚本/样式/隐藏子树），不可用时退回原始文本
//! 内容，再退回将内部标记序列化后重新解析为游离片段读取。所有路径都以
//! 空白规范化收尾。提取过程无副作用。

use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use markup5ever_rcdom::{Handle, NodeData, SerializableHandle};

use crate::dom::node::{get_node_attr, get_node_name};
use crate::dom::parse::html_to_dom;

/// 渲染文本中不可见的元素
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "template", "noscript"];

/// 折叠空白变体（含 NBSP、窄空格、窄不换行空格）为单个 ASCII 空格并去除首尾
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() || matches!(ch, '\u{00A0}' | '\u{2009}' | '\u{202F}') {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(ch);
    }
    out
}

fn collect_text(node: &Handle, rendered: bool, out: &mut String) {
    match &node.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        NodeData::Element { .. } => {
            if rendered {
                if let Some(name) = get_node_name(node) {
                    if SKIPPED_ELEMENTS.contains(&name) {
                        return;
                    }
                }
                if get_node_attr(node, "hidden").is_some() {
                    return;
                }
            }
            for child in node.children.borrow().iter() {
                collect_text(child, rendered, out);
            }
        }
        _ => {
            for child in node.children.borrow().iter() {
                collect_text(child, rendered, out);
            }
        }
    }
}

/// 渲染文本：跳过不可见子树
pub fn inner_text(node: &Handle) -> String {
    let mut out = String::new();
    collect_text(node, true, &mut out);
    out
}

/// 原始文本内容：包含全部文本后代
pub fn text_content(node: &Handle) -> String {
    let mut out = String::new();
    collect_text(node, false, &mut out);
    out
}

/// 将子节点序列化后重新解析为游离片段再读取渲染文本
fn detached_fragment_text(node: &Handle) -> String {
    let mut buf: Vec<u8> = Vec::new();
    let options = SerializeOpts {
        traversal_scope: TraversalScope::ChildrenOnly(None),
        ..Default::default()
    };
    if serialize(&mut buf, &SerializableHandle::from(node.clone()), options).is_err() {
        return String::new();
    }

    let fragment = html_to_dom(&buf, "utf-8");
    inner_text(&fragment.document)
}

/// 提取并规范化节点文本
///
/// 依次尝试渲染文本、原始文本内容、游离片段重解析，取第一个非空结果。
pub fn extract_normalized_text(node: &Handle) -> String {
    let mut text = inner_text(node);
    if text.trim().is_empty() {
        text = text_content(node);
    }
    if text.trim().is_empty() {
        text = detached_fragment_text(node);
    }
    normalize_whitespace(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::{get_body_element, get_child_node_by_name};

    fn first_div(html: &str) -> (markup5ever_rcdom::RcDom, Handle) {
        let dom = html_to_dom(html.as_bytes(), "utf-8");
        let body = get_body_element(&dom.document).unwrap();
        let div = get_child_node_by_name(&body, "div").unwrap();
        (dom, div)
    }

    #[test]
    fn test_normalize_whitespace_variants() {
        assert_eq!(
            normalize_whitespace("  12\u{00A0}K\u{2009} views \u{202F} "),
            "12 K views"
        );
        assert_eq!(normalize_whitespace("3\n  days\tago"), "3 days ago");
        assert_eq!(normalize_whitespace("   "), "");
    }

    #[test]
    fn test_inner_text_skips_invisible_subtrees() {
        let (_dom, div) = first_div(
            "<html><body><div>3 days<script>var x;</script> ago<span hidden>junk</span></div></body></html>",
        );
        assert_eq!(normalize_whitespace(&inner_text(&div)), "3 days ago");
        assert!(text_content(&div).contains("var x;"));
    }

    #[test]
    fn test_extract_joins_nested_runs() {
        let (_dom, div) = first_div(
            "<html><body><div><span>12K views</span> \u{2022} <span>3 days ago</span></div></body></html>",
        );
        assert_eq!(extract_normalized_text(&div), "12K views \u{2022} 3 days ago");
    }

    #[test]
    fn test_extract_empty_element() {
        let (_dom, div) = first_div("<html><body><div>   </div></body></html>");
        assert_eq!(extract_normalized_text(&div), "");
    }
}
