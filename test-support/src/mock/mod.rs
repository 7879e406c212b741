//! Mock 实现模块
//!
//! 提供外部协作方的 Mock 实现，用于测试

pub mod logger;
pub mod registry;
