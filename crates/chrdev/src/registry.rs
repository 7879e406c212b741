//! 驱动注册表
//!
//! 持有固定数量的设备描述符，按顺序向外部注册服务发布，并在注销时逆序撤销。
//!
//! 约定与语义：
//!
//! - 初始化是“全有或全无”的：任何一个设备发布失败，都会逆序撤销已发布的设备、
//!   释放设备号区间，并回到 [`RegistryState::Unregistered`]。
//! - 注销尽力而为：某个设备撤销失败只记录警告，不影响其余设备和设备号区间的释放。
//! - 注销需要 `&mut self`，而会话借用 `&self`，因此存活会话期间无法注销。

use alloc::collections::BTreeSet;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use uapi::fcntl::OpenFlags;

use crate::config::{DEFAULT_NODE_PREFIX, DEFAULT_REGION_NAME};
use crate::devno::{major, minor};
use crate::{
    AccessSession, DevError, DevRange, DevRegistryOps, DeviceDescriptor, DevicePolicy,
    DeviceSpec, DriverConfig, PublishHandle,
};

/// 注册表生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    /// 未注册，可以初始化
    Unregistered,
    /// 正在逐个发布设备
    Registering,
    /// 所有设备均已发布，可以接受会话
    Active,
    /// 正在逆序撤销设备
    Unregistering,
}

/// 设备信息（用于列举）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// 设备节点名
    pub name: String,
    /// 主设备号
    pub major: u32,
    /// 次设备号
    pub minor: u32,
    /// 序列号
    pub identity: String,
    /// 容量（字节）
    pub capacity: usize,
    /// 权限策略
    pub policy: DevicePolicy,
}

/// 注销结果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TeardownReport {
    /// 成功撤销的设备数
    pub revoked: usize,
    /// 撤销失败的设备号及原因
    pub revoke_failures: Vec<(u64, DevError)>,
}

impl TeardownReport {
    /// 是否所有撤销都成功
    pub fn is_clean(&self) -> bool {
        self.revoke_failures.is_empty()
    }
}

/// 驱动注册表
pub struct DriverRegistry {
    /// 外部设备注册服务
    ops: Arc<dyn DevRegistryOps>,

    /// 设备号区间名
    region_name: String,

    /// 设备节点名前缀
    node_prefix: String,

    /// 生命周期状态
    state: RegistryState,

    /// 已分配的设备号区间
    range: Option<DevRange>,

    /// 设备描述符，下标即次设备号偏移
    devices: Vec<DeviceDescriptor>,

    /// 已发布设备的句柄，按发布顺序排列
    published: Vec<PublishHandle>,
}

impl DriverRegistry {
    /// 创建空注册表，使用默认命名
    pub fn new(ops: Arc<dyn DevRegistryOps>) -> Self {
        Self::with_names(ops, DEFAULT_REGION_NAME, DEFAULT_NODE_PREFIX)
    }

    /// 创建空注册表，指定设备号区间名和节点名前缀
    pub fn with_names(
        ops: Arc<dyn DevRegistryOps>,
        region_name: impl Into<String>,
        node_prefix: impl Into<String>,
    ) -> Self {
        Self {
            ops,
            region_name: region_name.into(),
            node_prefix: node_prefix.into(),
            state: RegistryState::Unregistered,
            range: None,
            devices: Vec::new(),
            published: Vec::new(),
        }
    }

    /// 按配置创建注册表并完成初始化
    pub fn load(ops: Arc<dyn DevRegistryOps>, config: &DriverConfig) -> Result<Self, DevError> {
        let mut registry =
            Self::with_names(ops, config.region_name.as_str(), config.node_prefix.as_str());
        registry.initialize(&config.devices)?;
        Ok(registry)
    }

    /// 当前状态
    pub fn state(&self) -> RegistryState {
        self.state
    }

    /// 已分配的设备号区间
    pub fn range(&self) -> Option<DevRange> {
        self.range
    }

    /// 已发布的设备数
    pub fn published_count(&self) -> usize {
        self.published.len()
    }

    /// 初始化：分配设备号区间并按顺序发布每个设备
    ///
    /// 任何一步失败都会完整回滚后返回错误，不会留下部分注册的状态。
    pub fn initialize(&mut self, specs: &[DeviceSpec]) -> Result<(), DevError> {
        if self.state != RegistryState::Unregistered {
            return Err(DevError::Busy);
        }
        Self::validate_specs(specs)?;
        let count = u32::try_from(specs.len()).map_err(|_| DevError::InvalidArgument)?;

        self.state = RegistryState::Registering;

        let range = match self.ops.allocate_range(count, &self.region_name) {
            Ok(range) => range,
            Err(err) => {
                log::error!("[pcd] device number allocation failed: {}", err);
                self.state = RegistryState::Unregistered;
                return Err(err);
            }
        };
        self.range = Some(range);
        if range.count() < count {
            log::error!(
                "[pcd] allocated {} device numbers, {} requested",
                range.count(),
                count
            );
            self.rollback();
            return Err(DevError::AllocationFailed);
        }

        for (index, spec) in specs.iter().enumerate() {
            if let Err(err) = self.register_one(range, index, spec) {
                log::error!("[pcd] registering device {} failed: {}", index, err);
                self.rollback();
                return Err(err);
            }
        }

        self.state = RegistryState::Active;
        log::info!("[pcd] driver init success, {} devices", self.devices.len());
        Ok(())
    }

    /// 注销：逆序撤销所有设备并释放设备号区间
    ///
    /// 只能在 [`RegistryState::Active`] 状态下调用。撤销失败不会中断注销，
    /// 失败项记录在返回的 [`TeardownReport`] 中。
    pub fn teardown(&mut self) -> Result<TeardownReport, DevError> {
        if self.state != RegistryState::Active {
            return Err(DevError::NotActive);
        }
        self.state = RegistryState::Unregistering;
        let report = self.unwind();
        log::info!("[pcd] driver unloaded");
        Ok(report)
    }

    /// 按设备号查找设备
    pub fn device(&self, devno: u64) -> Result<&DeviceDescriptor, DevError> {
        if self.state != RegistryState::Active {
            return Err(DevError::NoDevice);
        }
        let index = self
            .range
            .and_then(|range| range.index_of(devno))
            .ok_or(DevError::NoDevice)?;
        self.devices.get(index).ok_or(DevError::NoDevice)
    }

    /// 按节点名查找设备
    pub fn device_by_name(&self, name: &str) -> Result<&DeviceDescriptor, DevError> {
        if self.state != RegistryState::Active {
            return Err(DevError::NoDevice);
        }
        self.devices
            .iter()
            .find(|dev| dev.name() == name)
            .ok_or(DevError::NoDevice)
    }

    /// 按设备号打开设备
    pub fn open(&self, devno: u64, flags: OpenFlags) -> Result<AccessSession<'_>, DevError> {
        log::debug!("[pcd] minor access: {}", minor(devno));
        self.device(devno)?.open_with_flags(flags)
    }

    /// 按节点名打开设备
    pub fn open_by_name(&self, name: &str, flags: OpenFlags) -> Result<AccessSession<'_>, DevError> {
        self.device_by_name(name)?.open_with_flags(flags)
    }

    /// 列出所有已发布设备
    pub fn list_devices(&self) -> Vec<DeviceInfo> {
        if self.state != RegistryState::Active {
            return Vec::new();
        }
        self.devices
            .iter()
            .map(|dev| DeviceInfo {
                name: String::from(dev.name()),
                major: major(dev.devno()),
                minor: minor(dev.devno()),
                identity: String::from(dev.identity()),
                capacity: dev.capacity(),
                policy: dev.policy(),
            })
            .collect()
    }

    // ========== 内部辅助函数 ==========

    /// 在接触注册服务之前检查整张设备表
    fn validate_specs(specs: &[DeviceSpec]) -> Result<(), DevError> {
        if specs.is_empty() {
            return Err(DevError::InvalidArgument);
        }
        let mut seen = BTreeSet::new();
        for spec in specs {
            spec.validate()?;
            if !seen.insert(spec.identity.as_str()) {
                return Err(DevError::InvalidArgument);
            }
        }
        Ok(())
    }

    /// 构造并发布第 `index` 个设备
    fn register_one(
        &mut self,
        range: DevRange,
        index: usize,
        spec: &DeviceSpec,
    ) -> Result<(), DevError> {
        let devno = u32::try_from(index)
            .ok()
            .and_then(|index| range.nth(index))
            .ok_or(DevError::InvalidArgument)?;
        let device = DeviceDescriptor::new(devno, format!("{}-{}", self.node_prefix, index), spec)?;
        log::info!(
            "[pcd] device number <major>:<minor> = {}:{} ({})",
            major(devno),
            minor(devno),
            device.name()
        );

        let handle = self.ops.publish(devno, device.name())?;
        self.devices.push(device);
        self.published.push(handle);
        Ok(())
    }

    /// 初始化失败时回滚
    fn rollback(&mut self) {
        let report = self.unwind();
        log::warn!(
            "[pcd] registration rolled back, {} devices revoked",
            report.revoked
        );
    }

    /// 逆序撤销已发布设备、释放存储区和设备号区间，回到未注册状态
    fn unwind(&mut self) -> TeardownReport {
        let mut report = TeardownReport::default();

        while let Some(handle) = self.published.pop() {
            match self.ops.revoke(handle) {
                Ok(()) => report.revoked += 1,
                Err(err) => {
                    log::warn!(
                        "[pcd] revoking {}:{} failed: {}",
                        major(handle.devno()),
                        minor(handle.devno()),
                        err
                    );
                    report.revoke_failures.push((handle.devno(), err));
                }
            }
            // 与句柄一一对应，逆序释放
            self.devices.pop();
        }
        self.devices.clear();

        if let Some(range) = self.range.take() {
            self.ops.release_range(range);
        }
        self.state = RegistryState::Unregistered;
        report
    }
}

impl Drop for DriverRegistry {
    fn drop(&mut self) {
        if self.state == RegistryState::Active {
            // 失败项已在 unwind 中记录
            let _ = self.teardown();
        }
    }
}

impl fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("region_name", &self.region_name)
            .field("state", &self.state)
            .field("range", &self.range)
            .field("devices", &self.devices)
            .field("published", &self.published.len())
            .finish()
    }
}
