//! 扫描调度器
//!
//! 纯状态机，时间由调用方注入，便于测试也与具体的变更通知机制解耦。
//! 防抖类触发（DOM 变动、显式重刷）重置尾沿延迟，把突发变更合并为
//! 一次扫描；节流类触发（主题切换、导航）取前沿，窗口内的后续触发
//! 直接丢弃。

use std::time::{Duration, Instant};

/// 触发扫描的事件种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanTrigger {
    /// 结构性 DOM 变动
    DomMutation,
    /// 显式的重新着色请求
    Restyle,
    /// 主题/属性变动
    ThemeChange,
    /// 导航完成
    Navigation,
}

impl ScanTrigger {
    fn is_debounced(&self) -> bool {
        matches!(self, ScanTrigger::DomMutation | ScanTrigger::Restyle)
    }
}

/// Idle / Scheduled 两态调度器
#[derive(Debug)]
pub struct ScanScheduler {
    debounce_delay: Duration,
    throttle_delay: Duration,
    /// Some = Scheduled，到期后执行一趟扫描
    deadline: Option<Instant>,
    /// 节流窗口的关闭时刻
    throttle_until: Option<Instant>,
}

impl ScanScheduler {
    pub fn new(debounce_delay: Duration, throttle_delay: Duration) -> Self {
        Self {
            debounce_delay,
            throttle_delay,
            deadline: None,
            throttle_until: None,
        }
    }

    /// 登记一次触发；返回 `true` 表示应当立即执行扫描（节流前沿）
    pub fn notify(&mut self, trigger: ScanTrigger, now: Instant) -> bool {
        if trigger.is_debounced() {
            // 已有排期时重置尾沿
            self.deadline = Some(now + self.debounce_delay);
            return false;
        }

        if let Some(until) = self.throttle_until {
            if now < until {
                // 窗口未关，丢弃
                return false;
            }
        }
        self.throttle_until = Some(now + self.throttle_delay);
        true
    }

    /// 到期则消费排期并返回 `true`
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.deadline.is_some()
    }

    /// 导航后丢弃全部排期与节流窗口
    pub fn reset(&mut self) {
        self.deadline = None;
        self.throttle_until = None;
    }
}
