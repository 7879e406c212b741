//! 伪字符设备驱动的宿主加载程序
//!
//! 按参考配置加载驱动，把设备发布到内存节点表，对每个设备按其权限策略做一次读写演示，
//! 最后注销驱动。日志级别见 [`logging`]。

mod logging;
mod node_table;

use std::process::ExitCode;
use std::sync::Arc;

use chrdev::{
    DevError, DeviceInfo, DevicePolicy, DriverConfig, DriverRegistry, OpenFlags, SeekWhence,
    major, minor,
};

use crate::node_table::NodeTable;

fn main() -> ExitCode {
    logging::init();

    let table = Arc::new(NodeTable::new());
    let config = DriverConfig::default();

    let mut registry = match DriverRegistry::load(table.clone(), &config) {
        Ok(registry) => registry,
        Err(err) => {
            log::error!("[pcd] driver init failed: {}", err);
            return exit_code(err);
        }
    };

    print_device_table(&registry, &table);

    let mut failed = None;
    for info in registry.list_devices() {
        if let Err(err) = exercise(&registry, &info) {
            log::error!("[pcd] {}: {}", info.name, err);
            if failed.is_none() {
                failed = Some(err);
            }
        }
    }

    match registry.teardown() {
        Ok(report) if !report.is_clean() => {
            log::warn!(
                "[pcd] {} devices could not be revoked",
                report.revoke_failures.len()
            );
        }
        Ok(_) => {}
        Err(err) => log::error!("[pcd] teardown failed: {}", err),
    }
    if table.region_count() != 0 || !table.nodes().is_empty() {
        log::error!("[pcd] node table not empty after unload");
    }

    failed.map_or(ExitCode::SUCCESS, exit_code)
}

fn exit_code(err: DevError) -> ExitCode {
    ExitCode::from(u8::try_from(err.to_errno().unsigned_abs()).unwrap_or(u8::MAX))
}

fn print_device_table(registry: &DriverRegistry, table: &NodeTable) {
    println!(
        "{:<10} {:>9} {:<14} {:>8}  {:<4}  policy",
        "node", "dev", "serial", "size", "perm"
    );
    for info in registry.list_devices() {
        println!(
            "{:<10} {:>9} {:<14} {:>8}  {:#04x}  {:?}",
            format!("/dev/{}", info.name),
            format!("{}:{}", info.major, info.minor),
            info.identity,
            info.capacity,
            info.policy.bits(),
            info.policy
        );
    }
    for node in table.nodes() {
        log::trace!(
            "[pcd] node {} -> {}:{}",
            node.name,
            major(node.devno),
            minor(node.devno)
        );
    }
}

/// 按设备策略做一次演示：允许的方式读写一遍，不允许的方式确认被拒绝
fn exercise(registry: &DriverRegistry, info: &DeviceInfo) -> Result<(), DevError> {
    let message = format!("hello from {}", info.identity);

    match info.policy {
        DevicePolicy::ReadOnly => {
            expect_denied(registry.open_by_name(&info.name, OpenFlags::O_WRONLY).err())?;
            let mut session = registry.open_by_name(&info.name, OpenFlags::O_RDONLY)?;
            let mut buf = vec![0u8; info.capacity];
            let n = session.read(&mut buf)?;
            log::info!("[pcd] {} read {} bytes", info.name, n);
            session.release();
        }
        DevicePolicy::WriteOnly => {
            expect_denied(registry.open_by_name(&info.name, OpenFlags::O_RDONLY).err())?;
            let mut session = registry.open_by_name(&info.name, OpenFlags::O_WRONLY)?;
            let n = session.write(message.as_bytes())?;
            log::info!("[pcd] {} wrote {} bytes", info.name, n);
            session.release();
        }
        DevicePolicy::ReadWrite => {
            let mut session = registry.open_by_name(&info.name, OpenFlags::O_RDWR)?;
            session.write(message.as_bytes())?;
            session.seek(0, SeekWhence::Set)?;
            let mut buf = vec![0u8; message.len()];
            let n = session.read(&mut buf)?;
            if buf[..n] != *message.as_bytes() {
                return Err(DevError::IoError);
            }
            log::info!(
                "[pcd] {} echoed \"{}\"",
                info.name,
                String::from_utf8_lossy(&buf[..n])
            );
            session.release();
        }
    }
    Ok(())
}

fn expect_denied(err: Option<DevError>) -> Result<(), DevError> {
    match err {
        Some(DevError::PermissionDenied) => Ok(()),
        Some(err) => Err(err),
        // 本应被拒绝的打开却成功了
        None => Err(DevError::InvalidArgument),
    }
}
