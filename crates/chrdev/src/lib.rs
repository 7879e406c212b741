//! 伪字符设备驱动核心
//!
//! 此 crate 把若干块固定容量的内存缓冲区以字符设备的形式暴露出来，包括：
//!
//! - [`DeviceDescriptor`] - 单个设备：容量、权限策略、序列号与独占的存储区
//! - [`AccessSession`] - 一次 open 得到的访问会话：独立的读写位置与协商好的访问模式
//! - [`DriverRegistry`] - 持有全部设备，驱动注册/注销流程并保证失败时整体回滚
//! - [`DevRegistryOps`] - 设备号分配与设备节点发布的外部接口
//!
//! # 生命周期
//!
//! ```text
//! Unregistered --initialize--> Registering --全部发布成功--> Active
//!      ^                            |                          |
//!      +------ 任一发布失败：回滚 ----+                     teardown
//!      +-------------------- Unregistering <------------------+
//! ```
//!
//! 会话借用设备描述符（`AccessSession<'_>`），而 [`DriverRegistry::teardown`] 需要
//! `&mut self`，因此“先释放会话再注销设备”由借用检查器保证。
//!
//! # 日志
//!
//! 所有日志都经由 `log` 门面输出，本 crate 不安装任何 logger。

#![no_std]

extern crate alloc;

pub mod config;
pub mod devno;
pub mod error;
pub mod ops;

mod descriptor;
mod policy;
mod registry;
mod session;

#[cfg(test)]
mod tests;

// Re-export error
pub use error::DevError;

// Re-export devno
pub use devno::{DevRange, major, makedev, minor};

// Re-export ops
pub use ops::{DevRegistryOps, PublishHandle};

// Re-export policy
pub use policy::{AccessMode, DevicePolicy};

// Re-export descriptor
pub use descriptor::{DeviceDescriptor, DeviceSpec};

// Re-export session
pub use session::AccessSession;

// Re-export registry
pub use registry::{DeviceInfo, DriverRegistry, RegistryState, TeardownReport};

// Re-export config
pub use config::{DriverConfig, REFERENCE_DEVICES};

// Re-export uapi types for convenience
pub use uapi::fcntl::{OpenFlags, SeekWhence};
