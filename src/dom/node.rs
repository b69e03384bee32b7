//! 基础 DOM 节点操作

use std::cell::RefCell;
use std::rc::Rc;

use html5ever::interface::{Attribute, QualName};
use html5ever::tendril::format_tendril;
use html5ever::tree_builder::create_element;
use html5ever::{namespace_url, ns, LocalName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom};

/// 获取节点名称
pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// 获取节点属性值
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => {
            for attr in attrs.borrow().iter() {
                if &*attr.name.local == attr_name {
                    return Some(attr.value.to_string());
                }
            }
            None
        }
        _ => None,
    }
}

/// 设置节点属性；`None` 表示移除该属性
pub fn set_node_attr(node: &Handle, attr_name: &str, attr_value: Option<String>) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let attrs_mut = &mut attrs.borrow_mut();
        let mut i = 0;
        let mut found_existing_attr: bool = false;

        while i < attrs_mut.len() {
            if &attrs_mut[i].name.local == attr_name {
                found_existing_attr = true;

                if let Some(attr_value) = attr_value.clone() {
                    attrs_mut[i].value.clear();
                    attrs_mut[i].value.push_slice(attr_value.as_str());
                } else {
                    // 值为 None 时整个移除属性
                    attrs_mut.remove(i);
                    continue;
                }
            }
            i += 1;
        }

        if !found_existing_attr {
            if let Some(attr_value) = attr_value {
                let name = LocalName::from(attr_name);
                attrs_mut.push(Attribute {
                    name: QualName::new(None, ns!(), name),
                    value: format_tendril!("{}", attr_value),
                });
            }
        }
    }
}

/// 根据名称获取子节点
pub fn get_child_node_by_name(parent: &Handle, node_name: &str) -> Option<Handle> {
    let children = parent.children.borrow();
    let matching_children = children.iter().find(|child| match child.data {
        NodeData::Element { ref name, .. } => &*name.local == node_name,
        _ => false,
    });
    matching_children.cloned()
}

/// 文档根 `<html>` 元素
pub fn get_root_element(document: &Handle) -> Option<Handle> {
    get_child_node_by_name(document, "html")
}

/// 文档 `<body>` 元素
pub fn get_body_element(document: &Handle) -> Option<Handle> {
    get_root_element(document).and_then(|html| get_child_node_by_name(&html, "body"))
}

/// 节点身份键，用于弱引用缓存的索引
pub fn node_key(node: &Handle) -> usize {
    Rc::as_ptr(node) as usize
}

/// 判断元素 class 列表是否包含给定类名
pub fn has_class(node: &Handle, class_name: &str) -> bool {
    get_node_attr(node, "class")
        .map(|value| value.split_whitespace().any(|c| c == class_name))
        .unwrap_or(false)
}

/// 创建带文本内容的 `<span>` 元素
pub fn create_span(dom: &RcDom, text: &str) -> Handle {
    let span = create_element(
        dom,
        QualName::new(None, ns!(), LocalName::from("span")),
        vec![],
    );
    let text_node = Node::new(NodeData::Text {
        contents: RefCell::new(format_tendril!("{}", text)),
    });
    text_node.parent.set(Some(Rc::downgrade(&span)));
    span.children.borrow_mut().push(text_node);
    span
}

/// 以新的子节点集合整体替换元素内容
pub fn replace_children(parent: &Handle, new_children: Vec<Handle>) {
    let mut children = parent.children.borrow_mut();
    children.clear();
    for child in new_children {
        child.parent.set(Some(Rc::downgrade(parent)));
        children.push(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse::html_to_dom;

    #[test]
    fn test_attr_roundtrip() {
        let dom = html_to_dom(b"<html lang=\"en\"><body></body></html>", "utf-8");
        let root = get_root_element(&dom.document).unwrap();
        assert_eq!(get_node_attr(&root, "lang").as_deref(), Some("en"));

        set_node_attr(&root, "lang", Some("fr".to_string()));
        assert_eq!(get_node_attr(&root, "lang").as_deref(), Some("fr"));

        set_node_attr(&root, "lang", None);
        assert_eq!(get_node_attr(&root, "lang"), None);
    }

    #[test]
    fn test_has_class() {
        let dom = html_to_dom(
            b"<html><body><div class=\"dark-mode other\"></div></body></html>",
            "utf-8",
        );
        let body = get_body_element(&dom.document).unwrap();
        let div = get_child_node_by_name(&body, "div").unwrap();
        assert!(has_class(&div, "dark-mode"));
        assert!(has_class(&div, "other"));
        assert!(!has_class(&div, "dark"));
    }

    #[test]
    fn test_replace_children_with_spans() {
        let dom = html_to_dom(b"<html><body><div>old text</div></body></html>", "utf-8");
        let body = get_body_element(&dom.document).unwrap();
        let div = get_child_node_by_name(&body, "div").unwrap();

        let left = create_span(&dom, "left");
        let right = create_span(&dom, "right");
        replace_children(&div, vec![left, right]);

        assert_eq!(div.children.borrow().len(), 2);
        assert_eq!(crate::dom::text::text_content(&div), "leftright");
    }
}
