//! DOM 访问层
//!
//! 这个模块封装引擎与 rcdom 文档树之间的全部交互：
//!
//! - `parse`: HTML 字节到 DOM 的解析与重新序列化
//! - `node`: 元素属性、节点创建与身份键
//! - `query`: 轻量级 CSS 选择器引擎
//! - `style`: 内联样式声明与调色板自定义属性的读写
//! - `text`: 渲染文本提取与空白规范化

pub mod node;
pub mod parse;
pub mod query;
pub mod style;
pub mod text;

// 重新导出主要的公共 API
pub use node::{
    create_span, get_body_element, get_child_node_by_name, get_node_attr, get_node_name,
    get_root_element, has_class, node_key, replace_children, set_node_attr,
};
pub use parse::{html_to_dom, serialize_document};
pub use query::{query_selector, query_selector_all, SelectorList};
pub use style::{get_style_property, remove_style_property, set_style_property};
pub use text::{extract_normalized_text, inner_text, normalize_whitespace, text_content};
