//! Linux 错误码（正数形式）
//!
//! 驱动返回给调用方时取负值，例如 `-EPERM`。

/// Operation not permitted
pub const EPERM: i32 = 1;
/// No such device or address
pub const ENXIO: i32 = 6;
/// Out of memory
pub const ENOMEM: i32 = 12;
/// Bad address
pub const EFAULT: i32 = 14;
/// Device or resource busy
pub const EBUSY: i32 = 16;
/// No such device
pub const ENODEV: i32 = 19;
/// Invalid argument
pub const EINVAL: i32 = 22;
