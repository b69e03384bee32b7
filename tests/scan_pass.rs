//! 整文档扫描趟的集成测试

use quickview::dom::node::{get_body_element, set_node_attr};
use quickview::dom::query::{query_selector, query_selector_all, SelectorList};
use quickview::dom::style::get_style_property;
use quickview::{EngineOptions, QuickViewEngine};

fn engine(html: &str) -> QuickViewEngine {
    QuickViewEngine::from_html(html.as_bytes(), "utf-8", EngineOptions::default())
}

fn style_of(engine: &QuickViewEngine, selector: &str, property: &str) -> Option<String> {
    let list = SelectorList::parse(selector).unwrap();
    let node = query_selector(&engine.document(), &list)?;
    get_style_property(&node, property)
}

const METADATA_SPAN: &str = r#"span.yt-core-attributed-string[role="text"]"#;

fn metadata_doc(text: &str) -> String {
    format!(
        r#"<html lang="en"><body>
            <span class="yt-core-attributed-string" role="text">{}</span>
        </body></html>"#,
        text
    )
}

#[test]
fn scan_styles_metadata_span() {
    let mut engine = engine(&metadata_doc("3 days ago"));
    assert!(engine.scan() > 0);
    // 浅色主题的 date-day 默认色
    assert_eq!(
        style_of(&engine, METADATA_SPAN, "color").as_deref(),
        Some("#0F9D58")
    );
    assert_eq!(
        style_of(&engine, METADATA_SPAN, "font-weight").as_deref(),
        Some("normal")
    );
}

#[test]
fn second_scan_is_a_cache_hit() {
    let mut engine = engine(&metadata_doc("500K views"));
    assert!(engine.scan() > 0);
    assert_eq!(engine.scan(), 0);
    assert_eq!(
        style_of(&engine, METADATA_SPAN, "color").as_deref(),
        Some("#C48938")
    );
}

#[test]
fn age_beats_views_in_combined_phrase() {
    let mut engine = engine(&metadata_doc("3 days ago \u{00B7} 12K views"));
    engine.scan();
    assert_eq!(
        style_of(&engine, METADATA_SPAN, "color").as_deref(),
        Some("#0F9D58")
    );
}

#[test]
fn billions_views_are_bold() {
    let mut engine = engine(&metadata_doc("2.3B views"));
    engine.scan();
    assert_eq!(
        style_of(&engine, METADATA_SPAN, "color").as_deref(),
        Some("#FBA434")
    );
    assert_eq!(
        style_of(&engine, METADATA_SPAN, "font-weight").as_deref(),
        Some("bold")
    );
}

#[test]
fn narrative_text_stays_unstyled() {
    let mut engine = engine(&metadata_doc(
        "a decade ago the channel switched to daily uploads for fun",
    ));
    assert_eq!(engine.scan(), 0);
    assert_eq!(style_of(&engine, METADATA_SPAN, "color"), None);
}

#[test]
fn dark_theme_uses_dark_palette() {
    let mut engine = engine(
        r#"<html lang="en" dark><body>
            <span class="yt-core-attributed-string" role="text">3 days ago</span>
        </body></html>"#,
    );
    engine.scan();
    assert_eq!(
        style_of(&engine, METADATA_SPAN, "color").as_deref(),
        Some("#54E38F")
    );
}

#[test]
fn french_document_uses_french_keywords() {
    let mut engine = engine(
        r#"<html lang="fr"><body>
            <span class="yt-core-attributed-string" role="text">il y a 3 jours</span>
            <span class="yt-content-metadata-view-model__metadata-text">1,2 M de vues</span>
        </body></html>"#,
    );
    engine.scan();
    assert_eq!(
        style_of(&engine, METADATA_SPAN, "color").as_deref(),
        Some("#0F9D58")
    );
    assert_eq!(
        style_of(&engine, r#"span[class*="metadata-text"]"#, "color").as_deref(),
        Some("#FA9717")
    );
}

#[test]
fn unsupported_language_leaves_document_untouched() {
    let mut engine = engine(
        r#"<html lang="de"><body>
            <span class="yt-core-attributed-string" role="text">3 days ago</span>
        </body></html>"#,
    );
    assert_eq!(engine.scan(), 0);
    assert_eq!(style_of(&engine, METADATA_SPAN, "color"), None);
}

#[test]
fn view_count_container_gets_anchor_appended() {
    let mut engine = engine(
        r#"<html lang="en"><body>
            <div id="view-count"><yt-formatted-string>12 K</yt-formatted-string></div>
        </body></html>"#,
    );
    assert!(engine.scan() > 0);
    // 上下文隐含观看次数："12 K" 补锚点后落入千位桶
    assert_eq!(
        style_of(&engine, "#view-count yt-formatted-string", "color").as_deref(),
        Some("#C48938")
    );
}

#[test]
fn date_container_joins_runs_and_styles_each() {
    let mut engine = engine(
        r#"<html lang="en"><body>
            <div id="date-text"><yt-formatted-string>Premiered </yt-formatted-string><yt-formatted-string>2 weeks ago</yt-formatted-string></div>
        </body></html>"#,
    );
    engine.scan();
    let list = SelectorList::parse("#date-text yt-formatted-string").unwrap();
    let runs = query_selector_all(&engine.document(), &list);
    assert_eq!(runs.len(), 2);
    // 拼接结果分类为周桶，样式落到每个组成段上
    for run in &runs {
        assert_eq!(
            get_style_property(run, "color").as_deref(),
            Some("#0D7377")
        );
    }
}

#[test]
fn videowall_combined_string_is_split_into_spans() {
    let html = format!(
        r#"<html lang="en"><body>
            <div class="ytp-modern-videowall-still-view-count-and-date-info">12K views {} 3 days ago</div>
        </body></html>"#,
        '\u{2022}'
    );
    let mut engine = engine(&html);
    assert!(engine.scan() > 0);

    let container = query_selector(
        &engine.document(),
        &SelectorList::parse(r#"[class*="videowall-still-view-count"]"#).unwrap(),
    )
    .unwrap();
    let spans = query_selector_all(&container, &SelectorList::parse("span").unwrap());
    assert_eq!(spans.len(), 3);
    assert_eq!(
        get_style_property(&spans[0], "color").as_deref(),
        Some("#C48938")
    );
    // 分隔符 span 不着色，只有布局边距
    assert_eq!(get_style_property(&spans[1], "color"), None);
    assert_eq!(get_style_property(&spans[1], "margin").as_deref(), Some("0 4px"));
    assert_eq!(
        get_style_property(&spans[2], "color").as_deref(),
        Some("#0F9D58")
    );

    // 再扫一趟：已拆分的子 span 原地复核，零写入
    assert_eq!(engine.scan(), 0);
}

#[test]
fn videowall_preserves_matched_separator_glyph() {
    let html = format!(
        r#"<html lang="en"><body>
            <div class="ytp-modern-videowall-still-view-count-and-date-info">12K views {} 3 days ago</div>
        </body></html>"#,
        '\u{00B7}'
    );
    let mut engine = engine(&html);
    engine.scan();

    let container = query_selector(
        &engine.document(),
        &SelectorList::parse(r#"[class*="videowall-still-view-count"]"#).unwrap(),
    )
    .unwrap();
    let spans = query_selector_all(&container, &SelectorList::parse("span").unwrap());
    assert_eq!(spans.len(), 3);
    // 命中的是间隔号就保留间隔号，不改写成圆点
    assert_eq!(
        quickview::dom::text::text_content(&spans[1]),
        " \u{00B7} "
    );
}

#[test]
fn videowall_splits_at_age_anchor_without_separator() {
    let mut engine = engine(
        r#"<html lang="en"><body>
            <div class="ytp-modern-videowall-still-view-count-and-date-info">12K views streamed long ago</div>
        </body></html>"#,
    );
    assert!(engine.scan() > 0);

    let container = query_selector(
        &engine.document(),
        &SelectorList::parse(r#"[class*="videowall-still-view-count"]"#).unwrap(),
    )
    .unwrap();
    let spans = query_selector_all(&container, &SelectorList::parse("span").unwrap());
    assert_eq!(spans.len(), 3);
    assert_eq!(
        quickview::dom::text::text_content(&spans[0]),
        "12K views streamed long"
    );
    assert_eq!(
        get_style_property(&spans[0], "color").as_deref(),
        Some("#C48938")
    );
    // 锚点拆分没有分隔符原文，物化为默认圆点
    assert_eq!(
        quickview::dom::text::text_content(&spans[1]),
        " \u{2022} "
    );
    // 裸锚点短语落入 date-default 桶
    assert_eq!(
        get_style_property(&spans[2], "color").as_deref(),
        Some("#137333")
    );
}

#[test]
fn detached_node_is_dropped_from_caches() {
    let mut engine = engine(&metadata_doc("3 days ago"));
    engine.scan();
    assert_eq!(engine.styled_node_count(), 1);

    // 把 span 从树上摘除并丢弃全部强引用
    let body = get_body_element(&engine.document()).unwrap();
    body.children.borrow_mut().clear();
    assert_eq!(engine.styled_node_count(), 0);

    // 下一趟扫描清理死条目，不会复活节点
    engine.scan();
    assert_eq!(engine.processed_count(), 0);
}

#[test]
fn theme_toggle_restyles_without_reload() {
    let mut engine = engine(&metadata_doc("3 days ago"));
    engine.scan();
    assert_eq!(
        style_of(&engine, METADATA_SPAN, "color").as_deref(),
        Some("#0F9D58")
    );

    let root =
        quickview::dom::node::get_root_element(&engine.document()).unwrap();
    set_node_attr(&root, "dark", Some(String::new()));
    assert!(engine.scan() > 0);
    assert_eq!(
        style_of(&engine, METADATA_SPAN, "color").as_deref(),
        Some("#54E38F")
    );
}
