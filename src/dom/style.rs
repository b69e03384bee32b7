//! 内联样式声明读写
//!
//! 引擎的 DOM 写入面只有两类：节点上的 `color` / `font-weight` 声明，
//! 以及根元素上的九个调色板自定义属性。这里按声明粒度编辑 `style`
//! 属性，保留节点上已有的其他声明。

use markup5ever_rcdom::Handle;

use crate::dom::node::{get_node_attr, set_node_attr};

fn parse_declarations(node: &Handle) -> Vec<(String, String)> {
    let Some(style) = get_node_attr(node, "style") else {
        return Vec::new();
    };

    let mut declarations = Vec::new();
    for declaration in style.split(';') {
        let Some((name, value)) = declaration.split_once(':') else {
            continue;
        };
        let name = name.trim();
        let value = value.trim();
        if !name.is_empty() && !value.is_empty() {
            declarations.push((name.to_string(), value.to_string()));
        }
    }
    declarations
}

fn write_declarations(node: &Handle, declarations: Vec<(String, String)>) {
    if declarations.is_empty() {
        set_node_attr(node, "style", None);
        return;
    }
    let text = declarations
        .iter()
        .map(|(name, value)| format!("{}: {}", name, value))
        .collect::<Vec<_>>()
        .join("; ");
    set_node_attr(node, "style", Some(text));
}

/// 读取内联样式中某个声明的值
pub fn get_style_property(node: &Handle, property: &str) -> Option<String> {
    parse_declarations(node)
        .into_iter()
        .find(|(name, _)| name == property)
        .map(|(_, value)| value)
}

/// 写入（或更新）内联样式声明
pub fn set_style_property(node: &Handle, property: &str, value: &str) {
    let mut declarations = parse_declarations(node);
    if let Some(entry) = declarations.iter_mut().find(|(name, _)| name == property) {
        entry.1 = value.to_string();
    } else {
        declarations.push((property.to_string(), value.to_string()));
    }
    write_declarations(node, declarations);
}

/// 移除内联样式声明；最后一个声明移除后连同 `style` 属性一起删除
pub fn remove_style_property(node: &Handle, property: &str) {
    let mut declarations = parse_declarations(node);
    declarations.retain(|(name, _)| name != property);
    write_declarations(node, declarations);
}
