//! 设备权限策略与会话访问模式

use bitflags::bitflags;
use uapi::fcntl::OpenFlags;

use crate::DevError;

/// 设备的读写权限策略，创建后不可变
///
/// 原始编码与 C 驱动保持一致：只读 `0x01`，只写 `0x10`，读写 `0x11`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevicePolicy {
    /// 只允许以只读方式打开
    ReadOnly,
    /// 只允许以只写方式打开
    WriteOnly,
    /// 任意方式打开
    ReadWrite,
}

impl DevicePolicy {
    /// 只读策略的原始编码
    pub const RDONLY: u32 = 0x01;
    /// 只写策略的原始编码
    pub const WRONLY: u32 = 0x10;
    /// 读写策略的原始编码
    pub const RDWR: u32 = 0x11;

    /// 转换为原始编码
    pub const fn bits(&self) -> u32 {
        match self {
            DevicePolicy::ReadOnly => Self::RDONLY,
            DevicePolicy::WriteOnly => Self::WRONLY,
            DevicePolicy::ReadWrite => Self::RDWR,
        }
    }

    /// 从原始编码解析，未知编码返回 `None`
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            Self::RDONLY => Some(DevicePolicy::ReadOnly),
            Self::WRONLY => Some(DevicePolicy::WriteOnly),
            Self::RDWR => Some(DevicePolicy::ReadWrite),
            _ => None,
        }
    }

    /// 检查请求的访问模式是否被策略允许
    ///
    /// - 读写设备：任何模式都允许
    /// - 只读设备：只允许恰好为 [`AccessMode::READ`]
    /// - 只写设备：只允许恰好为 [`AccessMode::WRITE`]
    pub fn check(&self, mode: AccessMode) -> Result<(), DevError> {
        let allowed = match self {
            DevicePolicy::ReadWrite => true,
            DevicePolicy::ReadOnly => mode == AccessMode::READ,
            DevicePolicy::WriteOnly => mode == AccessMode::WRITE,
        };
        if allowed {
            Ok(())
        } else {
            Err(DevError::PermissionDenied)
        }
    }
}

bitflags! {
    /// 会话的访问模式（对应内核的 `FMODE_READ` / `FMODE_WRITE`）
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AccessMode: u32 {
        /// 可读
        const READ = 0x1;
        /// 可写
        const WRITE = 0x2;
    }
}

impl From<OpenFlags> for AccessMode {
    fn from(flags: OpenFlags) -> Self {
        let mut mode = AccessMode::empty();
        if flags.readable() {
            mode |= AccessMode::READ;
        }
        if flags.writable() {
            mode |= AccessMode::WRITE;
        }
        mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_bits_roundtrip() {
        for policy in [
            DevicePolicy::ReadOnly,
            DevicePolicy::WriteOnly,
            DevicePolicy::ReadWrite,
        ] {
            assert_eq!(DevicePolicy::from_bits(policy.bits()), Some(policy));
        }
        assert_eq!(DevicePolicy::from_bits(0), None);
        assert_eq!(DevicePolicy::from_bits(0x02), None);
    }

    #[test]
    fn test_access_mode_from_open_flags() {
        assert_eq!(AccessMode::from(OpenFlags::O_RDONLY), AccessMode::READ);
        assert_eq!(AccessMode::from(OpenFlags::O_WRONLY), AccessMode::WRITE);
        assert_eq!(AccessMode::from(OpenFlags::O_RDWR), AccessMode::all());
        assert_eq!(AccessMode::from(OpenFlags::O_ACCMODE), AccessMode::empty());
    }

    #[test]
    fn test_empty_mode_only_on_read_write_device() {
        assert!(DevicePolicy::ReadWrite.check(AccessMode::empty()).is_ok());
        assert_eq!(
            DevicePolicy::ReadOnly.check(AccessMode::empty()),
            Err(DevError::PermissionDenied)
        );
        assert_eq!(
            DevicePolicy::WriteOnly.check(AccessMode::empty()),
            Err(DevError::PermissionDenied)
        );
    }
}
