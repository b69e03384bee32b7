//! 轻量级 CSS 选择器引擎
//!
//! 支持扫描目录实际用到的语法子集：标签名、`#id`、`.class`、`[attr]`、
//! `[attr="v"]`、`[attr*="v"]`、后代组合器与逗号列表。不支持的语法
//! （伪类等）作为可恢复的 [`EngineError::Selector`] 返回，调用方按条目
//! 隔离失败并继续扫描。

use markup5ever_rcdom::{Handle, NodeData};

use crate::core::{EngineError, EngineResult};
use crate::dom::node::{get_node_attr, get_node_name, has_class};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    /// `[attr]`
    Exists,
    /// `[attr="v"]`
    Equals,
    /// `[attr*="v"]`
    Contains,
}

#[derive(Debug, Clone)]
struct AttrMatcher {
    name: String,
    op: AttrOp,
    value: String,
}

/// 单个复合选择器：`span.foo#bar[role="text"]`
#[derive(Debug, Clone, Default)]
struct CompoundSelector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatcher>,
}

/// 后代链，祖先在前
#[derive(Debug, Clone)]
struct ComplexSelector {
    compounds: Vec<CompoundSelector>,
}

/// 解析后的选择器列表（逗号分隔的并集）
#[derive(Debug, Clone)]
pub struct SelectorList {
    selectors: Vec<ComplexSelector>,
}

impl SelectorList {
    /// 解析选择器字符串
    pub fn parse(input: &str) -> EngineResult<SelectorList> {
        let mut selectors = Vec::new();

        for part in input.split(',') {
            let part = part.trim();
            if part.is_empty() {
                return Err(EngineError::Selector(format!("空选择器分支: {:?}", input)));
            }

            let mut compounds = Vec::new();
            for token in part.split_whitespace() {
                compounds.push(parse_compound(token)?);
            }
            selectors.push(ComplexSelector { compounds });
        }

        Ok(SelectorList { selectors })
    }
}

fn is_ident(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_'))
}

fn parse_compound(token: &str) -> EngineResult<CompoundSelector> {
    let mut compound = CompoundSelector::default();
    let mut rest = token;

    // 标签名只能出现在复合选择器最前
    let name_end = rest.find(['#', '.', '[', ':']).unwrap_or(rest.len());
    if name_end > 0 {
        let tag = &rest[..name_end];
        if tag != "*" && !is_ident(tag) {
            return Err(EngineError::Selector(format!("无效标签名: {:?}", token)));
        }
        if tag != "*" {
            compound.tag = Some(tag.to_ascii_lowercase());
        }
        rest = &rest[name_end..];
    }

    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix('#') {
            let end = tail.find(['#', '.', '[', ':']).unwrap_or(tail.len());
            let id = &tail[..end];
            if !is_ident(id) {
                return Err(EngineError::Selector(format!("无效 id 选择器: {:?}", token)));
            }
            compound.id = Some(id.to_string());
            rest = &tail[end..];
        } else if let Some(tail) = rest.strip_prefix('.') {
            let end = tail.find(['#', '.', '[', ':']).unwrap_or(tail.len());
            let class = &tail[..end];
            if !is_ident(class) {
                return Err(EngineError::Selector(format!(
                    "无效 class 选择器: {:?}",
                    token
                )));
            }
            compound.classes.push(class.to_string());
            rest = &tail[end..];
        } else if let Some(tail) = rest.strip_prefix('[') {
            let end = tail.find(']').ok_or_else(|| {
                EngineError::Selector(format!("属性选择器未闭合: {:?}", token))
            })?;
            compound.attrs.push(parse_attr(&tail[..end], token)?);
            rest = &tail[end + 1..];
        } else {
            // 伪类与其他未知语法都走这里
            return Err(EngineError::Selector(format!(
                "不支持的选择器语法: {:?}",
                token
            )));
        }
    }

    Ok(compound)
}

fn parse_attr(inner: &str, token: &str) -> EngineResult<AttrMatcher> {
    let (name, op, raw_value) = if let Some(pos) = inner.find("*=") {
        (&inner[..pos], AttrOp::Contains, &inner[pos + 2..])
    } else if let Some(pos) = inner.find('=') {
        (&inner[..pos], AttrOp::Equals, &inner[pos + 1..])
    } else {
        (inner, AttrOp::Exists, "")
    };

    let name = name.trim();
    if !is_ident(name) {
        return Err(EngineError::Selector(format!(
            "无效属性名: {:?}",
            token
        )));
    }

    let value = raw_value
        .trim()
        .trim_matches('"')
        .trim_matches('\'')
        .to_string();
    if op != AttrOp::Exists && value.is_empty() {
        return Err(EngineError::Selector(format!(
            "属性选择器缺少值: {:?}",
            token
        )));
    }

    Ok(AttrMatcher {
        name: name.to_string(),
        op,
        value,
    })
}

fn matches_compound(node: &Handle, compound: &CompoundSelector) -> bool {
    let Some(name) = get_node_name(node) else {
        return false;
    };
    if let Some(tag) = &compound.tag {
        if !name.eq_ignore_ascii_case(tag) {
            return false;
        }
    }
    if let Some(id) = &compound.id {
        if get_node_attr(node, "id").as_deref() != Some(id.as_str()) {
            return false;
        }
    }
    for class in &compound.classes {
        if !has_class(node, class) {
            return false;
        }
    }
    for matcher in &compound.attrs {
        let Some(value) = get_node_attr(node, &matcher.name) else {
            return false;
        };
        let ok = match matcher.op {
            AttrOp::Exists => true,
            AttrOp::Equals => value == matcher.value,
            AttrOp::Contains => value.contains(&matcher.value),
        };
        if !ok {
            return false;
        }
    }
    true
}

/// 自右向左匹配后代链：节点匹配末位复合选择器，祖先栈贪婪消耗其余前缀
fn matches_complex(node: &Handle, ancestors: &[Handle], selector: &ComplexSelector) -> bool {
    let Some((last, prefix)) = selector.compounds.split_last() else {
        return false;
    };
    if !matches_compound(node, last) {
        return false;
    }

    let mut remaining = prefix.len();
    for ancestor in ancestors.iter().rev() {
        if remaining == 0 {
            break;
        }
        if matches_compound(ancestor, &prefix[remaining - 1]) {
            remaining -= 1;
        }
    }
    remaining == 0
}

fn walk(node: &Handle, list: &SelectorList, ancestors: &mut Vec<Handle>, found: &mut Vec<Handle>) {
    let is_element = matches!(node.data, NodeData::Element { .. });

    if is_element {
        if list
            .selectors
            .iter()
            .any(|selector| matches_complex(node, ancestors, selector))
        {
            found.push(node.clone());
        }
        ancestors.push(node.clone());
    }

    for child in node.children.borrow().iter() {
        walk(child, list, ancestors, found);
    }

    if is_element {
        ancestors.pop();
    }
}

/// 按文档顺序返回 `root` 后代中匹配的元素（不含 `root` 自身）
pub fn query_selector_all(root: &Handle, list: &SelectorList) -> Vec<Handle> {
    let mut found = Vec::new();
    let mut ancestors = Vec::new();
    for child in root.children.borrow().iter() {
        walk(child, list, &mut ancestors, &mut found);
    }
    found
}

/// 返回第一个匹配的后代元素
pub fn query_selector(root: &Handle, list: &SelectorList) -> Option<Handle> {
    query_selector_all(root, list).into_iter().next()
}
