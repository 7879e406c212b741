//! 设备注册表操作 trait 定义
//!
//! 此模块定义了驱动需要的外部设备注册服务接口：分配连续设备号、发布设备节点、
//! 撤销发布。宿主（或测试）实现此 trait，并在构造 [`crate::DriverRegistry`] 时传入。

use crate::{DevError, DevRange};

/// 发布设备节点后由注册服务返回的句柄，撤销时交还
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishHandle {
    devno: u64,
    token: usize,
}

impl PublishHandle {
    /// 创建句柄，`token` 的含义由注册服务自行决定
    pub const fn new(devno: u64, token: usize) -> Self {
        Self { devno, token }
    }

    /// 被发布的设备号
    pub const fn devno(&self) -> u64 {
        self.devno
    }

    /// 注册服务内部标识
    pub const fn token(&self) -> usize {
        self.token
    }
}

/// 外部设备注册服务
///
/// 对应内核中 `alloc_chrdev_region` / `cdev_add` + `device_create` /
/// `device_destroy` + `cdev_del` / `unregister_chrdev_region` 这一组接口。
pub trait DevRegistryOps: Send + Sync {
    /// 以 `name` 为名分配 `count` 个连续设备号
    fn allocate_range(&self, count: u32, name: &str) -> Result<DevRange, DevError>;

    /// 归还 [`DevRegistryOps::allocate_range`] 分配的设备号
    fn release_range(&self, range: DevRange);

    /// 以 `name` 发布设备节点，使其可按设备号被发现
    fn publish(&self, devno: u64, name: &str) -> Result<PublishHandle, DevError>;

    /// 撤销发布，尽力而为
    ///
    /// 重复撤销同一句柄应返回 `Ok(())` 且无副作用。
    fn revoke(&self, handle: PublishHandle) -> Result<(), DevError>;
}
