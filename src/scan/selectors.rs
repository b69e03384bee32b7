//! 扫描选择器目录
//!
//! 按固定优先级排列的 (主选择器, 候补选择器, 选项) 条目，覆盖宿主
//! 渲染器各类卡片的元数据文本位置。主选择器无匹配时改查候补；解析
//! 失败的条目被记录并跳过，不影响其余条目。

/// 单条扫描条目的处理选项
#[derive(Debug, Clone, Copy)]
pub struct EntryOptions {
    /// 经过 ProcessedSet 闸门，跳过已处理节点
    pub use_processed_gate: bool,
    /// 分类前要求文本含时间或观看锚点（廉价预过滤）
    pub require_keyword: bool,
    /// 文本含观看关键字时先做补锚点变换
    pub append_views_keyword: bool,
}

/// 通用扫描趟的默认选项
pub const GENERIC: EntryOptions = EntryOptions {
    use_processed_gate: true,
    require_keyword: true,
    append_views_keyword: true,
};

/// 一条带候补的选择器条目
#[derive(Debug, Clone, Copy)]
pub struct SelectorEntry {
    pub primary: &'static str,
    pub fallback: Option<&'static str>,
    pub options: EntryOptions,
}

const fn entry(primary: &'static str, fallback: Option<&'static str>) -> SelectorEntry {
    SelectorEntry {
        primary,
        fallback,
        options: GENERIC,
    }
}

/// 通用扫描趟的条目目录，按优先级排列
pub const SELECTOR_ENTRIES: &[SelectorEntry] = &[
    // 首页与订阅页的元数据行
    entry(
        "span.yt-content-metadata-view-model__metadata-text",
        Some(r#"span[class*="metadata-text"]"#),
    ),
    entry("yt-formatted-string span", None),
    // 频道页网格
    entry(
        "ytd-grid-video-renderer #metadata-line span",
        Some(r#"ytd-grid-video-renderer span[class*="style-scope"]"#),
    ),
    // Shorts
    entry(
        ".shortsLockupViewModelHostMetadataSubhead span",
        Some(".shortsLockupViewModelHostOutsideMetadataSubhead span"),
    ),
    entry(r#"span.yt-core-attributed-string[role="text"]"#, None),
    // 帖子
    entry(
        "yt-formatted-string#published-time-text a",
        Some(r#"yt-formatted-string[id="published-time-text"] a"#),
    ),
    entry("ytd-backstage-post-renderer yt-formatted-string a", None),
    // 播放页（聚合容器之外的残余 span）
    entry(
        "#view-count yt-formatted-string span",
        Some(r#"[id*="view-count"] yt-formatted-string span, [id*="viewCount"] yt-formatted-string span"#),
    ),
    entry(
        "#date-text yt-formatted-string span",
        Some(r#"[id*="date-text"] yt-formatted-string span, [id*="dateText"] yt-formatted-string span"#),
    ),
    // 视频元数据块
    entry("ytd-video-meta-block span.inline-metadata-item", None),
    // 评论时间戳
    entry(
        "a.yt-simple-endpoint.style-scope.ytd-comment-view-model",
        Some(r#"a[class*="comment-view-model"], ytd-comment-view-model a"#),
    ),
];

/// 聚合处理器独占的容器：通用趟跳过其内部节点
pub const AGGREGATE_CONTAINER_IDS: &[&str] = &["view-count", "date-text"];

/// 观看次数聚合容器
pub const VIEW_COUNT_SELECTOR: &str = "#view-count";
pub const VIEW_COUNT_FALLBACK: &str = r#"[id*="view-count"], [id*="viewCount"]"#;

/// 发布日期聚合容器
pub const DATE_TEXT_SELECTOR: &str = "#date-text";
pub const DATE_TEXT_FALLBACK: &str = r#"[id*="date-text"], [id*="dateText"]"#;

/// 推荐卡片（videowall）：首个有结果的选择器生效
pub const VIDEOWALL_SELECTORS: &[&str] = &[
    ".ytp-modern-videowall-still-view-count-and-date-info",
    r#"[class*="videowall-still-view-count"]"#,
    r#"[class*="ytp-modern-videowall"]"#,
];
