//! 设备注册服务的 Mock 实现
//!
//! 注意：这里不直接依赖 `chrdev` crate（避免循环依赖）。
//! `chrdev` crate 在 `cfg(test)` 下为这些类型实现其 trait（`DevRegistryOps`）。
//! 因此这里的接口只使用基本类型：设备号用 `u64`，区间用 `(major, first_minor, count)`。

use std::collections::BTreeMap;
use std::sync::Mutex;

/// 第一个动态分配的 major（与 Linux 动态区间的上端一致，向下分配）
pub const MOCK_FIRST_MAJOR: u32 = 511;

/// Mock 收到的调用记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    /// 分配设备号区间
    Allocate {
        /// 请求数量
        count: u32,
        /// 区间名
        name: String,
    },
    /// 释放设备号区间
    Release {
        /// 区间 major
        major: u32,
        /// 区间首个 minor
        first_minor: u32,
        /// 区间长度
        count: u32,
    },
    /// 发布设备节点
    Publish {
        /// 设备号
        dev: u64,
        /// 节点名
        name: String,
    },
    /// 撤销设备节点
    Revoke {
        /// 设备号
        dev: u64,
    },
}

#[derive(Default)]
struct MockState {
    next_major: Option<u32>,
    ranges: Vec<(u32, u32, u32)>,
    published: BTreeMap<u64, (String, usize)>,
    next_token: usize,
    publish_calls: usize,
    fail_allocation: bool,
    fail_publish_at: Option<usize>,
    fail_revoke: Vec<u64>,
    journal: Vec<MockCall>,
}

/// 可注入故障的设备注册服务
///
/// - [`MockDevRegistry::fail_allocation`]：下一次起所有分配失败
/// - [`MockDevRegistry::fail_publish_at`]：第 k 次（从 1 开始计数）发布失败
/// - [`MockDevRegistry::fail_revoke_of`]：撤销指定设备号时失败（节点仍被移除）
#[derive(Default)]
pub struct MockDevRegistry {
    state: Mutex<MockState>,
}

impl MockDevRegistry {
    /// 创建一个没有注入故障的 Mock
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建 Mock，并指定第一个分配的 major
    ///
    /// 并行测试共享同一个全局 logger 时，可用不同的 major 区分各自的日志。
    pub fn with_first_major(major: u32) -> Self {
        let mock = Self::default();
        mock.state.lock().unwrap().next_major = Some(major);
        mock
    }

    /// 让之后的区间分配失败
    pub fn fail_allocation(&self, fail: bool) {
        self.state.lock().unwrap().fail_allocation = fail;
    }

    /// 让第 `k` 次发布失败（从 1 开始，计数从本次调用时重新开始）
    pub fn fail_publish_at(&self, k: usize) {
        let mut state = self.state.lock().unwrap();
        state.publish_calls = 0;
        state.fail_publish_at = Some(k);
    }

    /// 让撤销设备号 `dev` 时报告失败
    pub fn fail_revoke_of(&self, dev: u64) {
        self.state.lock().unwrap().fail_revoke.push(dev);
    }

    /// 分配 `count` 个连续设备号，返回 `(major, first_minor)`
    pub fn allocate(&self, count: u32, name: &str) -> Option<(u32, u32)> {
        let mut state = self.state.lock().unwrap();
        state.journal.push(MockCall::Allocate {
            count,
            name: name.to_string(),
        });
        if state.fail_allocation {
            return None;
        }
        let major = state.next_major.unwrap_or(MOCK_FIRST_MAJOR);
        state.next_major = Some(major - 1);
        state.ranges.push((major, 0, count));
        Some((major, 0))
    }

    /// 释放之前分配的区间
    pub fn release(&self, major: u32, first_minor: u32, count: u32) {
        let mut state = self.state.lock().unwrap();
        state.journal.push(MockCall::Release {
            major,
            first_minor,
            count,
        });
        state
            .ranges
            .retain(|range| *range != (major, first_minor, count));
    }

    /// 发布设备节点，返回句柄 token；注入故障时返回 `None`
    pub fn publish(&self, dev: u64, name: &str) -> Option<usize> {
        let mut state = self.state.lock().unwrap();
        state.journal.push(MockCall::Publish {
            dev,
            name: name.to_string(),
        });
        state.publish_calls += 1;
        if state.fail_publish_at == Some(state.publish_calls) {
            return None;
        }
        let token = state.next_token;
        state.next_token += 1;
        state.published.insert(dev, (name.to_string(), token));
        Some(token)
    }

    /// 撤销设备节点；注入故障时仍移除节点，但返回 `false`
    pub fn revoke(&self, dev: u64) -> bool {
        let mut state = self.state.lock().unwrap();
        state.journal.push(MockCall::Revoke { dev });
        state.published.remove(&dev);
        !state.fail_revoke.contains(&dev)
    }

    /// 当前已发布的节点数
    pub fn published_count(&self) -> usize {
        self.state.lock().unwrap().published.len()
    }

    /// 当前已发布的节点名（按设备号排序）
    pub fn published_names(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .published
            .values()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// 设备号是否已发布
    pub fn is_published(&self, dev: u64) -> bool {
        self.state.lock().unwrap().published.contains_key(&dev)
    }

    /// 尚未释放的区间数
    pub fn live_ranges(&self) -> usize {
        self.state.lock().unwrap().ranges.len()
    }

    /// 调用记录
    pub fn journal(&self) -> Vec<MockCall> {
        self.state.lock().unwrap().journal.clone()
    }

    /// 按顺序取出撤销过的设备号
    pub fn revoked(&self) -> Vec<u64> {
        self.journal()
            .into_iter()
            .filter_map(|call| match call {
                MockCall::Revoke { dev } => Some(dev),
                _ => None,
            })
            .collect()
    }
}
