//! 测试支持 crate
//!
//! 提供 Mock 实现和测试工具：
//!
//! - [`mock::registry::MockDevRegistry`] - 可注入故障的设备注册服务
//! - [`mock::logger::CaptureLogger`] - 记录所有日志的 `log` 后端

pub mod mock;
