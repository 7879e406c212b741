//! 驱动配置
//!
//! 默认配置即参考驱动的四个设备：各 1024 字节，权限依次为只读、只写、读写、读写。

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use lazy_static::lazy_static;

use crate::{DevicePolicy, DeviceSpec};

/// 参考配置的设备数
pub const DEFAULT_DEVICE_COUNT: usize = 4;

/// 参考配置中每个设备的容量（字节）
pub const DEFAULT_DEVICE_CAPACITY: usize = 1024;

/// 申请设备号区间时使用的名字
pub const DEFAULT_REGION_NAME: &str = "pcd_devices";

/// 设备节点名前缀，节点名为 `<prefix>-<index>`
pub const DEFAULT_NODE_PREFIX: &str = "pcdev";

lazy_static! {
    /// 参考设备表
    pub static ref REFERENCE_DEVICES: Vec<DeviceSpec> = vec![
        DeviceSpec::new("PCDEV1XYZ123", DEFAULT_DEVICE_CAPACITY, DevicePolicy::ReadOnly),
        DeviceSpec::new("PCDEV2XYZ123", DEFAULT_DEVICE_CAPACITY, DevicePolicy::WriteOnly),
        DeviceSpec::new("PCDEV3XYZ123", DEFAULT_DEVICE_CAPACITY, DevicePolicy::ReadWrite),
        DeviceSpec::new("PCDEV4XYZ123", DEFAULT_DEVICE_CAPACITY, DevicePolicy::ReadWrite),
    ];
}

/// 驱动配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// 设备号区间名
    pub region_name: String,
    /// 设备节点名前缀
    pub node_prefix: String,
    /// 按注册顺序排列的设备
    pub devices: Vec<DeviceSpec>,
}

impl DriverConfig {
    /// 使用默认命名和给定设备表
    pub fn with_devices(devices: Vec<DeviceSpec>) -> Self {
        Self {
            region_name: String::from(DEFAULT_REGION_NAME),
            node_prefix: String::from(DEFAULT_NODE_PREFIX),
            devices,
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::with_devices(REFERENCE_DEVICES.clone())
    }
}
