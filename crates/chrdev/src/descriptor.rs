//! 设备描述符
//!
//! 一个描述符对应一个逻辑设备：序列号、容量、权限策略以及独占的存储区。
//! 存储区长度在整个生命周期内恒等于容量，由每设备一把 [`SpinLock`] 保护。

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec;
use core::fmt;

use sync::SpinLock;
use uapi::fcntl::OpenFlags;

use crate::devno::{major, minor};
use crate::{AccessMode, AccessSession, DevError, DevicePolicy};

/// 设备的静态配置：`{identity, capacity, policy}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSpec {
    /// 序列号，驱动内唯一
    pub identity: String,
    /// 容量（字节），必须为正
    pub capacity: usize,
    /// 权限策略
    pub policy: DevicePolicy,
}

impl DeviceSpec {
    /// 创建设备配置
    pub fn new(identity: impl Into<String>, capacity: usize, policy: DevicePolicy) -> Self {
        Self {
            identity: identity.into(),
            capacity,
            policy,
        }
    }

    /// 以原始权限编码（`0x01`/`0x10`/`0x11`）创建设备配置
    ///
    /// 未知编码返回 [`DevError::InvalidArgument`]。
    pub fn with_policy_bits(
        identity: impl Into<String>,
        capacity: usize,
        bits: u32,
    ) -> Result<Self, DevError> {
        let policy = DevicePolicy::from_bits(bits).ok_or(DevError::InvalidArgument)?;
        Ok(Self::new(identity, capacity, policy))
    }

    /// 检查单个配置是否合法
    pub fn validate(&self) -> Result<(), DevError> {
        if self.capacity == 0 || self.identity.is_empty() {
            return Err(DevError::InvalidArgument);
        }
        Ok(())
    }
}

/// 设备描述符
pub struct DeviceDescriptor {
    /// 发布时使用的设备号
    devno: u64,

    /// 设备节点名
    name: String,

    /// 序列号
    identity: String,

    /// 容量（字节）
    capacity: usize,

    /// 权限策略
    policy: DevicePolicy,

    /// 存储区，长度固定为容量
    storage: SpinLock<Box<[u8]>>,
}

impl DeviceDescriptor {
    /// 按配置创建描述符，存储区清零
    pub fn new(devno: u64, name: impl Into<String>, spec: &DeviceSpec) -> Result<Self, DevError> {
        spec.validate()?;
        Ok(Self {
            devno,
            name: name.into(),
            identity: spec.identity.clone(),
            capacity: spec.capacity,
            policy: spec.policy,
            storage: SpinLock::new(vec![0u8; spec.capacity].into_boxed_slice()),
        })
    }

    /// 设备号
    pub fn devno(&self) -> u64 {
        self.devno
    }

    /// 设备节点名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 序列号
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// 容量（字节）
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 权限策略
    pub fn policy(&self) -> DevicePolicy {
        self.policy
    }

    /// 以指定访问模式打开设备
    ///
    /// 访问模式只在此处与权限策略比对一次，此后不再检查。
    pub fn open(&self, mode: AccessMode) -> Result<AccessSession<'_>, DevError> {
        log::debug!(
            "[pcd] open {} ({}:{}) mode={:?} policy={:?}",
            self.name,
            major(self.devno),
            minor(self.devno),
            mode,
            self.policy
        );

        match self.policy.check(mode) {
            Ok(()) => {
                log::debug!("[pcd] {} opened", self.name);
                Ok(AccessSession::new(self, mode))
            }
            Err(err) => {
                log::info!("[pcd] open {} failed: {}", self.name, err);
                Err(err)
            }
        }
    }

    /// 以 open(2) 标志打开设备，访问模式由 `O_ACCMODE` 推导
    pub fn open_with_flags(&self, flags: OpenFlags) -> Result<AccessSession<'_>, DevError> {
        self.open(AccessMode::from(flags))
    }

    /// 存储区锁，读写期间持有
    pub(crate) fn storage(&self) -> &SpinLock<Box<[u8]>> {
        &self.storage
    }
}

impl fmt::Debug for DeviceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceDescriptor")
            .field("name", &self.name)
            .field("devno", &format_args!("{}:{}", major(self.devno), minor(self.devno)))
            .field("identity", &self.identity)
            .field("capacity", &self.capacity)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
