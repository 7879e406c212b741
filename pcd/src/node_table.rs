//! 内存中的设备节点表
//!
//! 模拟 devtmpfs：按 Linux 的动态字符设备 major 区间分配设备号，每次从 511 向下取第一个
//! 空闲的 major（释放的 major 可再次分配），并以节点名登记已发布的设备。

use std::collections::BTreeMap;

use chrdev::{DevError, DevRange, DevRegistryOps, PublishHandle, major, makedev, minor};
use sync::SpinLock;

/// 动态分配 major 的上界（含）
pub const CHRDEV_MAJOR_DYN_END: u32 = 511;

/// 动态分配 major 的下界（含）
pub const CHRDEV_MAJOR_DYN_START: u32 = 234;

/// 已登记的设备节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceNode {
    /// 节点名（`/dev/<name>`）
    pub name: String,
    /// 设备号
    pub devno: u64,
}

struct Region {
    name: String,
    count: u32,
}

struct Inner {
    regions: BTreeMap<u32, Region>,
    nodes: BTreeMap<u64, (String, usize)>,
    next_token: usize,
}

/// 设备节点表
pub struct NodeTable {
    inner: SpinLock<Inner>,
}

impl NodeTable {
    /// 创建空节点表
    pub fn new() -> Self {
        Self {
            inner: SpinLock::new(Inner {
                regions: BTreeMap::new(),
                nodes: BTreeMap::new(),
                next_token: 0,
            }),
        }
    }

    /// 所有节点，按设备号排序
    pub fn nodes(&self) -> Vec<DeviceNode> {
        self.inner
            .lock()
            .nodes
            .iter()
            .map(|(&devno, (name, _))| DeviceNode {
                name: name.clone(),
                devno,
            })
            .collect()
    }

    /// 尚未释放的设备号区间数
    pub fn region_count(&self) -> usize {
        self.inner.lock().regions.len()
    }
}

impl Default for NodeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl DevRegistryOps for NodeTable {
    fn allocate_range(&self, count: u32, name: &str) -> Result<DevRange, DevError> {
        if count == 0 || count > 256 {
            return Err(DevError::InvalidArgument);
        }
        let mut inner = self.inner.lock();
        let major = (CHRDEV_MAJOR_DYN_START..=CHRDEV_MAJOR_DYN_END)
            .rev()
            .find(|major| !inner.regions.contains_key(major))
            .ok_or(DevError::AllocationFailed)?;
        inner.regions.insert(
            major,
            Region {
                name: String::from(name),
                count,
            },
        );
        log::debug!("[pcd] region {} -> major {} ({} minors)", name, major, count);
        Ok(DevRange::new(makedev(major, 0), count))
    }

    fn release_range(&self, range: DevRange) {
        let mut inner = self.inner.lock();
        if let Some(region) = inner.regions.remove(&range.major()) {
            log::debug!(
                "[pcd] region {} released ({} minors)",
                region.name,
                region.count
            );
        }
    }

    fn publish(&self, devno: u64, name: &str) -> Result<PublishHandle, DevError> {
        let mut inner = self.inner.lock();
        let in_region = inner
            .regions
            .get(&major(devno))
            .is_some_and(|region| minor(devno) < region.count);
        if !in_region {
            return Err(DevError::PublishFailed);
        }
        if inner.nodes.contains_key(&devno) || inner.nodes.values().any(|(n, _)| n == name) {
            return Err(DevError::PublishFailed);
        }
        let token = inner.next_token;
        inner.next_token += 1;
        inner.nodes.insert(devno, (String::from(name), token));
        Ok(PublishHandle::new(devno, token))
    }

    fn revoke(&self, handle: PublishHandle) -> Result<(), DevError> {
        let mut inner = self.inner.lock();
        let owner = inner.nodes.get(&handle.devno()).map(|(_, token)| *token);
        match owner {
            // 已撤销，重复撤销无副作用
            None => Ok(()),
            Some(token) if token == handle.token() => {
                inner.nodes.remove(&handle.devno());
                Ok(())
            }
            // 设备号已被重新发布，旧句柄不能撤销新节点
            Some(_) => Err(DevError::NoDevice),
        }
    }
}
