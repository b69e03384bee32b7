//! 引擎核心
//!
//! `QuickViewEngine` 按页面加载为单位封装一棵文档树和全部过程态：
//! 语言关键字、主题、调色板解析器、样式/已处理缓存、着色开关与调度器。
//! 导航事件整体重置过程态并立即扫描；其他触发经由调度器合并。

use std::time::{Duration, Instant};

use markup5ever_rcdom::{Handle, RcDom};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::dom::node::get_root_element;
use crate::dom::parse::html_to_dom;
use crate::dom::style::{remove_style_property, set_style_property};
use crate::messages::{Message, MessageResponse};
use crate::pipeline::cache::{ProcessedSet, StyleCache};
use crate::pipeline::classifier::{Category, PhraseLimits};
use crate::pipeline::locale::{detect_keyword_set, LocaleKeywordSet};
use crate::pipeline::palette::{detect_theme, OverrideScope, PaletteResolver, Theme};
use crate::scan::{run_scan_pass, PassContext, ScanScheduler, ScanTrigger};

/// 引擎可恢复错误
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("不支持的选择器: {0}")]
    Selector(String),
    #[error("消息编解码失败: {0}")]
    Json(#[from] serde_json::Error),
    #[error("无效的导航地址: {0}")]
    Url(#[from] url::ParseError),
}

pub type EngineResult<T> = Result<T, EngineError>;

fn default_debounce_ms() -> u64 {
    150
}

fn default_throttle_ms() -> u64 {
    300
}

/// 引擎配置；默认值即产品值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// 防抖尾沿延迟（毫秒）
    pub debounce_delay_ms: u64,
    /// 节流窗口长度（毫秒）
    pub throttle_delay_ms: u64,
    /// 时间短语的长度阈值
    pub phrase_limits: PhraseLimits,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            debounce_delay_ms: default_debounce_ms(),
            throttle_delay_ms: default_throttle_ms(),
            phrase_limits: PhraseLimits::default(),
        }
    }
}

/// 一次页面加载的全部过程态
struct EngineContext {
    keywords: Option<LocaleKeywordSet>,
    theme: Theme,
    colors_enabled: bool,
    current_path: Option<String>,
    palette: PaletteResolver,
    styles: StyleCache,
    processed: ProcessedSet,
}

impl EngineContext {
    fn new(document: &Handle) -> Self {
        Self {
            keywords: detect_keyword_set(document),
            theme: detect_theme(document),
            colors_enabled: true,
            current_path: None,
            palette: PaletteResolver::new(),
            styles: StyleCache::new(),
            processed: ProcessedSet::new(),
        }
    }
}

/// 分类与增量同步引擎
pub struct QuickViewEngine {
    dom: RcDom,
    options: EngineOptions,
    scheduler: ScanScheduler,
    ctx: EngineContext,
}

impl QuickViewEngine {
    /// 从 HTML 字节构造
    pub fn from_html(data: &[u8], document_encoding: &str, options: EngineOptions) -> Self {
        Self::from_dom(html_to_dom(data, document_encoding), options)
    }

    /// 从既有文档树构造
    pub fn from_dom(dom: RcDom, options: EngineOptions) -> Self {
        let ctx = EngineContext::new(&dom.document);
        let scheduler = ScanScheduler::new(
            Duration::from_millis(options.debounce_delay_ms),
            Duration::from_millis(options.throttle_delay_ms),
        );
        Self {
            dom,
            options,
            scheduler,
            ctx,
        }
    }

    pub fn dom(&self) -> &RcDom {
        &self.dom
    }

    pub fn document(&self) -> Handle {
        self.dom.document.clone()
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn current_path(&self) -> Option<&str> {
        self.ctx.current_path.as_deref()
    }

    pub fn colors_enabled(&self) -> bool {
        self.ctx.colors_enabled
    }

    /// 仍存活的已着色节点数
    pub fn styled_node_count(&self) -> usize {
        self.ctx.styles.live_nodes().len()
    }

    pub fn processed_count(&self) -> usize {
        self.ctx.processed.len()
    }

    /// 实时检测当前主题
    pub fn is_dark_theme(&self) -> bool {
        detect_theme(&self.dom.document) == Theme::Dark
    }

    /// 作废调色板快照并重开处理闸门
    ///
    /// 调色板变化要求已处理节点重新进入流水线；StyleCache 仍会抑制
    /// 颜色未变节点的写入，重扫只产生实际差异的写入量。
    fn invalidate_palette(&mut self) {
        self.ctx.palette.invalidate();
        self.ctx.processed.clear();
    }

    /// 主题属性变化后同步过程态；返回主题是否发生了切换
    fn refresh_theme(&mut self) -> bool {
        let theme = detect_theme(&self.dom.document);
        if theme == self.ctx.theme {
            return false;
        }
        self.ctx.theme = theme;
        self.invalidate_palette();
        true
    }

    /// 同步执行一趟扫描，返回实际发生的 DOM 写入数
    ///
    /// 着色关闭或语言不受支持时为无操作。
    pub fn scan(&mut self) -> usize {
        if !self.ctx.colors_enabled {
            return 0;
        }
        self.refresh_theme();
        let Some(keywords) = self.ctx.keywords.clone() else {
            return 0;
        };

        let snapshot = self.ctx.palette.snapshot(&self.dom.document, self.ctx.theme);
        let mut pass = PassContext {
            dom: &self.dom,
            keywords: &keywords,
            snapshot: &snapshot,
            limits: self.options.phrase_limits,
            styles: &mut self.ctx.styles,
            processed: &mut self.ctx.processed,
        };
        run_scan_pass(&mut pass)
    }

    /// 登记一次触发；节流前沿立即扫描，返回是否扫描了
    pub fn notify(&mut self, trigger: ScanTrigger, now: Instant) -> bool {
        if trigger == ScanTrigger::ThemeChange {
            self.invalidate_palette();
        }
        if self.scheduler.notify(trigger, now) {
            self.scan();
            true
        } else {
            false
        }
    }

    /// 防抖排期到期则执行扫描，返回是否扫描了
    pub fn run_pending(&mut self, now: Instant) -> bool {
        if self.scheduler.poll(now) {
            self.scan();
            true
        } else {
            false
        }
    }

    /// 导航完成：重置过程态、重新派生语言与主题并立即扫描；返回新路径
    pub fn handle_navigation(&mut self, url: &str, now: Instant) -> EngineResult<String> {
        let path = Url::parse(url)?.path().to_string();

        self.scheduler.reset();
        self.ctx.styles.clear();
        self.ctx.processed.clear();
        self.ctx.palette.invalidate();
        self.ctx.keywords = detect_keyword_set(&self.dom.document);
        self.ctx.theme = detect_theme(&self.dom.document);
        self.ctx.current_path = Some(path.clone());

        if self.scheduler.notify(ScanTrigger::Navigation, now) {
            self.scan();
        }
        Ok(path)
    }

    /// 开关着色；关闭时移除已写入的声明并清空缓存，开启时重新扫描
    pub fn set_colors_enabled(&mut self, enabled: bool) {
        self.ctx.colors_enabled = enabled;
        if enabled {
            // 关闭时根属性被清除，重新物化当前主题下生效的覆盖
            if let Some(root) = get_root_element(&self.dom.document) {
                for (category, color) in self.ctx.palette.overrides_for(self.ctx.theme) {
                    set_style_property(&root, category.css_var(), &color);
                }
            }
            self.invalidate_palette();
            self.scan();
        } else {
            self.clear_styles();
        }
    }

    fn clear_styles(&mut self) {
        for (node, _) in self.ctx.styles.live_nodes() {
            remove_style_property(&node, "color");
            remove_style_property(&node, "font-weight");
        }
        if let Some(root) = get_root_element(&self.dom.document) {
            for category in Category::ALL {
                remove_style_property(&root, category.css_var());
            }
        }
        self.ctx.styles.clear();
        self.ctx.processed.clear();
    }

    /// 登记一条颜色覆盖；键无法解析时返回 `false`
    ///
    /// 覆盖始终登记进解析器；只有其作用范围涵盖当前主题时才写根元素
    /// 的自定义属性并立即重扫。
    pub fn apply_color_override(&mut self, key: &str, color: &str) -> bool {
        let Some((scope, category)) = PaletteResolver::parse_override_key(key) else {
            warn!(key, "无法识别的颜色覆盖键");
            return false;
        };
        self.ctx
            .palette
            .set_override(scope, category, color.to_string());
        self.ctx.processed.clear();

        self.refresh_theme();
        let applies_now = match scope {
            OverrideScope::Any => true,
            OverrideScope::Dark => self.ctx.theme == Theme::Dark,
            OverrideScope::Light => self.ctx.theme == Theme::Light,
        };
        if applies_now {
            if let Some(root) = get_root_element(&self.dom.document) {
                set_style_property(&root, category.css_var(), color);
            }
            self.scan();
        }
        true
    }

    /// 处理一条已解码的消息
    pub fn handle_message(&mut self, message: Message) -> MessageResponse {
        match message {
            Message::ColorsEnabled { enabled } => {
                self.set_colors_enabled(enabled);
                MessageResponse::OK
            }
            Message::ColorChange { key, color } => {
                if self.apply_color_override(&key, &color) {
                    MessageResponse::OK
                } else {
                    MessageResponse::FAILED
                }
            }
            Message::GetTheme => MessageResponse::Theme {
                is_dark: self.is_dark_theme(),
            },
        }
    }

    /// JSON 进、JSON 出的消息通道入口
    pub fn handle_message_json(&mut self, raw: &str) -> EngineResult<String> {
        let message: Message = serde_json::from_str(raw)?;
        let response = self.handle_message(message);
        Ok(serde_json::to_string(&response)?)
    }
}
