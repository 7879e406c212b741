//! 设备错误类型
//!
//! 定义了驱动各操作可能返回的错误，可通过 [`DevError::to_errno()`] 转换为 Linux 风格的错误码。
//! 调用方不应依赖具体的错误码数值。

use core::fmt;

use uapi::errno::{EBUSY, EFAULT, EINVAL, ENODEV, ENOMEM, ENXIO, EPERM};

/// 设备错误类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevError {
    // 访问协议相关
    /// 打开模式与设备权限策略不符，或会话未以该模式打开 (-EPERM)
    PermissionDenied,
    /// seek 目标位置超出 `[0, capacity]` (-EINVAL)
    InvalidOffset,
    /// 无效参数：未知的 whence、非法的设备配置等 (-EINVAL)
    InvalidArgument,
    /// 与调用方缓冲区之间的拷贝无法完成 (-EFAULT)
    IoError,
    /// 当前位置已无剩余空间可写 (-ENOMEM)
    NoSpace,

    // 注册相关
    /// 设备号区间分配失败 (-EBUSY)
    AllocationFailed,
    /// 设备节点发布失败 (-ENODEV)
    PublishFailed,
    /// 设备号或设备名不对应任何已发布设备 (-ENXIO)
    NoDevice,
    /// 驱动不处于可初始化的状态 (-EBUSY)
    Busy,
    /// 驱动未处于活动状态，无法注销 (-EINVAL)
    NotActive,
}

impl DevError {
    /// 转换为系统调用错误码（负数）
    pub fn to_errno(&self) -> isize {
        let errno = match self {
            DevError::PermissionDenied => EPERM,
            DevError::InvalidOffset | DevError::InvalidArgument | DevError::NotActive => EINVAL,
            DevError::IoError => EFAULT,
            DevError::NoSpace => ENOMEM,
            DevError::AllocationFailed | DevError::Busy => EBUSY,
            DevError::PublishFailed => ENODEV,
            DevError::NoDevice => ENXIO,
        };
        -(errno as isize)
    }
}

impl fmt::Display for DevError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            DevError::PermissionDenied => "permission denied",
            DevError::InvalidOffset => "invalid offset",
            DevError::InvalidArgument => "invalid argument",
            DevError::IoError => "bad user buffer",
            DevError::NoSpace => "no space left on device",
            DevError::AllocationFailed => "device number allocation failed",
            DevError::PublishFailed => "device publication failed",
            DevError::NoDevice => "no such device",
            DevError::Busy => "driver busy",
            DevError::NotActive => "driver not active",
        };
        f.write_str(msg)
    }
}

impl From<DevError> for isize {
    fn from(err: DevError) -> Self {
        err.to_errno()
    }
}
