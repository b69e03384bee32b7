//! 主题感知调色板
//!
//! 每个类别的最终颜色按固定次序解析：当前主题的覆盖 → 不分主题的
//! 覆盖 → 根元素上的 CSS 自定义属性 → 内置默认表。覆盖存在时跳过
//! 根属性读取，避免把另一主题写下的陈旧值当成本主题的颜色。解析结果
//! 按主题做快照缓存，任何覆盖或主题默认的变更都整体失效。

use std::collections::HashMap;

use markup5ever_rcdom::Handle;

use super::classifier::Category;
use crate::dom::node::{get_body_element, get_node_attr, get_root_element, has_class};
use crate::dom::style::get_style_property;

/// 宿主主题
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    Dark,
    Light,
}

/// 覆盖的作用范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverrideScope {
    Dark,
    Light,
    /// 两个主题都生效
    Any,
}

impl OverrideScope {
    fn applies_to(&self, theme: Theme) -> bool {
        match self {
            OverrideScope::Dark => theme == Theme::Dark,
            OverrideScope::Light => theme == Theme::Light,
            OverrideScope::Any => true,
        }
    }
}

// 深色主题默认表，顺序与 Category::ALL 一致
const DEFAULT_COLORS_DARK: [&str; 9] = [
    "#64E354", // date-default
    "#54E38F", // date-day
    "#54D7E3", // date-week
    "#5484E3", // date-month
    "#8F6BEB", // date-year-1-3
    "#CC54E3", // date-year-3-plus
    "#FFE8C9", // views-k
    "#FFCC8A", // views-m
    "#FFB85C", // views-md
];

// 浅色主题默认表
const DEFAULT_COLORS_LIGHT: [&str; 9] = [
    "#137333", // date-default
    "#0F9D58", // date-day
    "#0D7377", // date-week
    "#1A73E8", // date-month
    "#6C1ED9", // date-year-1-3
    "#8E24AA", // date-year-3-plus
    "#C48938", // views-k
    "#FA9717", // views-m
    "#FBA434", // views-md
];

/// 内置默认颜色
pub fn default_color(category: Category, theme: Theme) -> &'static str {
    let table = match theme {
        Theme::Dark => &DEFAULT_COLORS_DARK,
        Theme::Light => &DEFAULT_COLORS_LIGHT,
    };
    let idx = Category::ALL
        .iter()
        .position(|c| *c == category)
        .unwrap_or(0);
    table[idx]
}

/// 检测宿主主题
///
/// `<html>` 或 `<body>` 带 `dark` 属性、或根元素 class 含 `dark-mode`
/// 即为深色，否则浅色。
pub fn detect_theme(document: &Handle) -> Theme {
    let Some(root) = get_root_element(document) else {
        return Theme::Light;
    };
    let body_dark = get_body_element(document)
        .map(|body| get_node_attr(&body, "dark").is_some())
        .unwrap_or(false);
    if get_node_attr(&root, "dark").is_some() || body_dark || has_class(&root, "dark-mode") {
        Theme::Dark
    } else {
        Theme::Light
    }
}

/// 某一主题下全部九个类别的已解析颜色
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteSnapshot {
    pub theme: Theme,
    colors: HashMap<Category, String>,
}

impl PaletteSnapshot {
    pub fn color_of(&self, category: Category) -> &str {
        self.colors
            .get(&category)
            .map(String::as_str)
            .unwrap_or_else(|| default_color(category, self.theme))
    }
}

/// 覆盖表 + 按主题缓存的快照
#[derive(Debug, Default)]
pub struct PaletteResolver {
    overrides: Vec<(OverrideScope, Category, String)>,
    cached: HashMap<Theme, PaletteSnapshot>,
}

impl PaletteResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 解析覆盖键
    ///
    /// 存储键可带 `-dark` / `-light` 后缀限定主题（"date-day-dark"、
    /// "views-k-light"），无后缀的键对两个主题都生效。
    pub fn parse_override_key(key: &str) -> Option<(OverrideScope, Category)> {
        let (scope, storage_key) = if let Some(base) = key.strip_suffix("-dark") {
            (OverrideScope::Dark, base)
        } else if let Some(base) = key.strip_suffix("-light") {
            (OverrideScope::Light, base)
        } else {
            (OverrideScope::Any, key)
        };
        Category::from_storage_key(storage_key).map(|category| (scope, category))
    }

    /// 登记覆盖；同一 (scope, category) 的旧值被替换
    pub fn set_override(&mut self, scope: OverrideScope, category: Category, color: String) {
        self.overrides
            .retain(|(s, c, _)| !(*s == scope && *c == category));
        self.overrides.push((scope, category, color));
        self.invalidate();
    }

    /// 当前主题下生效的覆盖（主题限定的优先于不分主题的）
    pub fn overrides_for(&self, theme: Theme) -> HashMap<Category, String> {
        let mut map = HashMap::new();
        for (scope, category, color) in &self.overrides {
            if *scope == OverrideScope::Any {
                map.entry(*category).or_insert_with(|| color.clone());
            }
        }
        for (scope, category, color) in &self.overrides {
            if scope.applies_to(theme) && *scope != OverrideScope::Any {
                map.insert(*category, color.clone());
            }
        }
        map
    }

    fn has_any_override(&self, category: Category) -> bool {
        self.overrides.iter().any(|(_, c, _)| *c == category)
    }

    /// 整体废弃已缓存的快照
    pub fn invalidate(&mut self) {
        self.cached.clear();
    }

    /// 解析（或复用缓存的）当前主题快照
    pub fn snapshot(&mut self, document: &Handle, theme: Theme) -> PaletteSnapshot {
        if let Some(snapshot) = self.cached.get(&theme) {
            return snapshot.clone();
        }

        let active = self.overrides_for(theme);
        let root = get_root_element(document);
        let mut colors = HashMap::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            let color = if let Some(color) = active.get(&category) {
                color.clone()
            } else if self.has_any_override(category) {
                // 只在另一主题下被覆盖的类别：根属性可能是陈旧覆盖值
                default_color(category, theme).to_string()
            } else if let Some(color) = root
                .as_ref()
                .and_then(|r| get_style_property(r, category.css_var()))
            {
                color
            } else {
                default_color(category, theme).to_string()
            };
            colors.insert(category, color);
        }

        let snapshot = PaletteSnapshot { theme, colors };
        self.cached.insert(theme, snapshot.clone());
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse::html_to_dom;
    use crate::dom::style::set_style_property;
    use crate::pipeline::classifier::AgeBucket;

    const DAY: Category = Category::Age(AgeBucket::Day);
    const WEEK: Category = Category::Age(AgeBucket::Week);

    fn dom(html: &str) -> markup5ever_rcdom::RcDom {
        html_to_dom(html.as_bytes(), "utf-8")
    }

    #[test]
    fn test_detect_theme() {
        assert_eq!(detect_theme(&dom("<html dark></html>").document), Theme::Dark);
        assert_eq!(
            detect_theme(&dom("<html><body dark></body></html>").document),
            Theme::Dark
        );
        assert_eq!(
            detect_theme(&dom("<html class=\"a dark-mode\"></html>").document),
            Theme::Dark
        );
        assert_eq!(detect_theme(&dom("<html></html>").document), Theme::Light);
    }

    #[test]
    fn test_defaults_differ_per_theme() {
        let doc = dom("<html></html>");
        let mut resolver = PaletteResolver::new();
        let dark = resolver.snapshot(&doc.document, Theme::Dark);
        let light = resolver.snapshot(&doc.document, Theme::Light);
        assert_eq!(dark.color_of(DAY), "#54E38F");
        assert_eq!(light.color_of(DAY), "#0F9D58");
        for category in Category::ALL {
            assert_ne!(dark.color_of(category), light.color_of(category));
        }
    }

    #[test]
    fn test_scoped_override_does_not_leak() {
        let doc = dom("<html></html>");
        let mut resolver = PaletteResolver::new();
        resolver.set_override(OverrideScope::Dark, DAY, "#123456".to_string());

        let dark = resolver.snapshot(&doc.document, Theme::Dark);
        assert_eq!(dark.color_of(DAY), "#123456");

        let light = resolver.snapshot(&doc.document, Theme::Light);
        assert_eq!(light.color_of(DAY), "#0F9D58");
    }

    #[test]
    fn test_any_override_applies_to_both_but_yields_to_scoped() {
        let doc = dom("<html></html>");
        let mut resolver = PaletteResolver::new();
        resolver.set_override(OverrideScope::Any, WEEK, "#AAAAAA".to_string());
        resolver.set_override(OverrideScope::Light, WEEK, "#BBBBBB".to_string());

        assert_eq!(
            resolver.snapshot(&doc.document, Theme::Dark).color_of(WEEK),
            "#AAAAAA"
        );
        assert_eq!(
            resolver.snapshot(&doc.document, Theme::Light).color_of(WEEK),
            "#BBBBBB"
        );
    }

    #[test]
    fn test_root_var_used_only_without_overrides() {
        let doc = dom("<html></html>");
        let root = get_root_element(&doc.document).unwrap();
        set_style_property(&root, DAY.css_var(), "#0000FF");

        let mut resolver = PaletteResolver::new();
        assert_eq!(
            resolver.snapshot(&doc.document, Theme::Dark).color_of(DAY),
            "#0000FF"
        );

        // 另一主题下的覆盖让根属性失去权威性，回到默认表
        resolver.set_override(OverrideScope::Light, DAY, "#00FF00".to_string());
        assert_eq!(
            resolver.snapshot(&doc.document, Theme::Dark).color_of(DAY),
            "#54E38F"
        );
    }

    #[test]
    fn test_snapshot_memoized_until_invalidated() {
        let doc = dom("<html></html>");
        let root = get_root_element(&doc.document).unwrap();
        let mut resolver = PaletteResolver::new();

        let before = resolver.snapshot(&doc.document, Theme::Dark);
        set_style_property(&root, DAY.css_var(), "#FF0000");
        // 缓存未失效，仍返回旧快照
        assert_eq!(resolver.snapshot(&doc.document, Theme::Dark), before);

        resolver.invalidate();
        assert_eq!(
            resolver.snapshot(&doc.document, Theme::Dark).color_of(DAY),
            "#FF0000"
        );
    }

    #[test]
    fn test_parse_override_key() {
        assert_eq!(
            PaletteResolver::parse_override_key("date-day-dark"),
            Some((OverrideScope::Dark, DAY))
        );
        assert_eq!(
            PaletteResolver::parse_override_key("views-k-light"),
            Some((
                OverrideScope::Light,
                Category::Views(crate::pipeline::classifier::ViewsBucket::Thousands)
            ))
        );
        assert_eq!(
            PaletteResolver::parse_override_key("date-week"),
            Some((OverrideScope::Any, WEEK))
        );
        assert_eq!(PaletteResolver::parse_override_key("date-day-solar"), None);
        assert_eq!(PaletteResolver::parse_override_key("nope-dark"), None);
    }
}
