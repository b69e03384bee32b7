//! 节点身份键控的弱引用缓存
//!
//! 以节点地址为键、弱引用为值：缓存自身不延长任何 DOM 节点的生命期。
//! 地址可能在节点释放后被新节点复用，因此每次命中都要求弱引用升级成功
//! 且与查询句柄指针相等，否则按未命中处理。`sweep` 在扫描开始时清掉
//! 已死条目，防止长会话下无界增长。

use std::collections::HashMap;
use std::rc::Rc;

use markup5ever_rcdom::{Handle, WeakHandle};

use super::classifier::{Category, FontWeight};
use crate::dom::node::node_key;

/// 已应用到节点上的样式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRecord {
    pub category: Category,
    pub weight: FontWeight,
    pub color: String,
}

/// 节点 → 已应用样式
#[derive(Debug, Default)]
pub struct StyleCache {
    entries: HashMap<usize, (WeakHandle, StyleRecord)>,
}

impl StyleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: &Handle, record: StyleRecord) {
        self.entries
            .insert(node_key(node), (Rc::downgrade(node), record));
    }

    /// 命中要求弱引用仍指向同一个节点
    pub fn get(&self, node: &Handle) -> Option<&StyleRecord> {
        let (weak, record) = self.entries.get(&node_key(node))?;
        let live = weak.upgrade()?;
        if Rc::ptr_eq(&live, node) {
            Some(record)
        } else {
            None
        }
    }

    pub fn remove(&mut self, node: &Handle) {
        self.entries.remove(&node_key(node));
    }

    /// 仍然存活的 (节点, 样式) 对；颜色开关关闭时据此回收写入的声明
    pub fn live_nodes(&self) -> Vec<(Handle, StyleRecord)> {
        self.entries
            .values()
            .filter_map(|(weak, record)| weak.upgrade().map(|node| (node, record.clone())))
            .collect()
    }

    /// 丢弃已死条目
    pub fn sweep(&mut self) {
        self.entries
            .retain(|_, (weak, _)| weak.upgrade().is_some());
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 已处理节点集合：阻止对同一节点的重复处理
#[derive(Debug, Default)]
pub struct ProcessedSet {
    entries: HashMap<usize, WeakHandle>,
}

impl ProcessedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: &Handle) {
        self.entries.insert(node_key(node), Rc::downgrade(node));
    }

    pub fn contains(&self, node: &Handle) -> bool {
        match self.entries.get(&node_key(node)) {
            Some(weak) => weak
                .upgrade()
                .map(|live| Rc::ptr_eq(&live, node))
                .unwrap_or(false),
            None => false,
        }
    }

    pub fn remove(&mut self, node: &Handle) {
        self.entries.remove(&node_key(node));
    }

    pub fn sweep(&mut self) {
        self.entries.retain(|_, weak| weak.upgrade().is_some());
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
