//! 跨上下文消息通道
//!
//! 配置界面通过 `{action, data}` 形式的 JSON 消息驱动引擎：开关着色、
//! 变更某个类别的颜色、查询当前主题。应答为 `{success}` 或 `{isDark}`。

use serde::{Deserialize, Serialize};

/// 入站消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data")]
pub enum Message {
    /// 开关着色；关闭时清除已写入的样式
    #[serde(rename = "colorsEnabled")]
    ColorsEnabled { enabled: bool },
    /// 变更某个类别的颜色；键可带 `-dark` / `-light` 主题后缀
    #[serde(rename = "colorChange")]
    ColorChange { key: String, color: String },
    /// 查询当前主题
    #[serde(rename = "getTheme")]
    GetTheme,
}

/// 出站应答
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageResponse {
    Ack {
        success: bool,
    },
    Theme {
        #[serde(rename = "isDark")]
        is_dark: bool,
    },
}

impl MessageResponse {
    pub const OK: MessageResponse = MessageResponse::Ack { success: true };
    pub const FAILED: MessageResponse = MessageResponse::Ack { success: false };
}
