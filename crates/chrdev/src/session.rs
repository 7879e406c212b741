//! 访问会话 - 设备访问协议的实现
//!
//! 会话由 [`DeviceDescriptor::open`] 创建，持有独立的读写位置；同一设备上的多个会话
//! 共享存储区。读写期间持有设备的存储区锁，seek 只修改本会话的位置，不加锁。
//!
//! 读写都按容量截断：
//!
//! - 读到末尾返回 0，不是错误；
//! - 写入时若一个字节都放不下，返回 [`DevError::NoSpace`]。

use uapi::fcntl::SeekWhence;

use crate::{AccessMode, DevError, DeviceDescriptor};

/// 访问会话
#[derive(Debug)]
pub struct AccessSession<'a> {
    /// 打开的设备（非拥有引用）
    device: &'a DeviceDescriptor,

    /// open 时协商得到的访问模式
    mode: AccessMode,

    /// 当前位置，始终处于 `[0, capacity]`
    cursor: usize,
}

impl<'a> AccessSession<'a> {
    pub(crate) fn new(device: &'a DeviceDescriptor, mode: AccessMode) -> Self {
        Self {
            device,
            mode,
            cursor: 0,
        }
    }

    /// 会话所属的设备
    pub fn device(&self) -> &'a DeviceDescriptor {
        self.device
    }

    /// 访问模式
    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// 会话是否可读
    pub fn readable(&self) -> bool {
        self.mode.contains(AccessMode::READ)
    }

    /// 会话是否可写
    pub fn writable(&self) -> bool {
        self.mode.contains(AccessMode::WRITE)
    }

    /// 当前位置
    pub fn offset(&self) -> usize {
        self.cursor
    }

    /// 设置读写位置
    ///
    /// 目标位置必须落在 `[0, capacity]`，否则返回 [`DevError::InvalidOffset`] 且位置不变。
    /// 恰好等于 `capacity` 是合法位置。
    pub fn seek(&mut self, offset: isize, whence: SeekWhence) -> Result<usize, DevError> {
        let capacity = self.device.capacity();
        log::debug!(
            "[pcd] {} seek offset={} whence={:?} current={}",
            self.device.name(),
            offset,
            whence,
            self.cursor
        );

        let base = match whence {
            SeekWhence::Set => 0,
            SeekWhence::Cur => self.cursor,
            SeekWhence::End => capacity,
        };
        let target = (base as isize)
            .checked_add(offset)
            .ok_or(DevError::InvalidOffset)?;
        if target < 0 || target as usize > capacity {
            return Err(DevError::InvalidOffset);
        }

        self.cursor = target as usize;
        log::debug!("[pcd] {} new position {}", self.device.name(), self.cursor);
        Ok(self.cursor)
    }

    /// 以原始 whence 值（`SEEK_SET`/`SEEK_CUR`/`SEEK_END`）设置位置
    ///
    /// 未知的 whence 返回 [`DevError::InvalidArgument`]。
    pub fn seek_raw(&mut self, offset: isize, whence: i32) -> Result<usize, DevError> {
        let whence = SeekWhence::try_from(whence).map_err(|_| DevError::InvalidArgument)?;
        self.seek(offset, whence)
    }

    /// 读取至多 `buf.len()` 字节
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, DevError> {
        self.read_count(buf.len(), buf)
    }

    /// 读取至多 `count` 字节到 `buf`
    ///
    /// 实际读取量为 `min(count, capacity - offset)`；`buf` 容纳不下实际读取量时返回
    /// [`DevError::IoError`]，位置不变。
    pub fn read_count(&mut self, count: usize, buf: &mut [u8]) -> Result<usize, DevError> {
        if !self.readable() {
            return Err(DevError::PermissionDenied);
        }

        let storage = self.device.storage().lock();
        let start = self.cursor;
        log::debug!(
            "[pcd] {} read requested {} bytes at {}",
            self.device.name(),
            count,
            start
        );
        let count = count.min(storage.len() - start);

        let Some(dst) = buf.get_mut(..count) else {
            log::info!("[pcd] {} error copying data to caller", self.device.name());
            return Err(DevError::IoError);
        };
        dst.copy_from_slice(&storage[start..start + count]);

        self.cursor = start + count;
        log::debug!(
            "[pcd] {} read {} bytes, position {}",
            self.device.name(),
            count,
            self.cursor
        );
        Ok(count)
    }

    /// 写入 `buf` 的全部内容（超出容量的部分被截断）
    pub fn write(&mut self, buf: &[u8]) -> Result<usize, DevError> {
        self.write_count(buf.len(), buf)
    }

    /// 从 `buf` 写入至多 `count` 字节
    ///
    /// 实际写入量为 `min(count, capacity - offset)`。实际写入量为 0 时返回
    /// [`DevError::NoSpace`]；`buf` 不足实际写入量时返回 [`DevError::IoError`]。
    pub fn write_count(&mut self, count: usize, buf: &[u8]) -> Result<usize, DevError> {
        if !self.writable() {
            return Err(DevError::PermissionDenied);
        }

        let mut storage = self.device.storage().lock();
        let start = self.cursor;
        log::debug!(
            "[pcd] {} write requested {} bytes at {}",
            self.device.name(),
            count,
            start
        );
        let count = count.min(storage.len() - start);

        if count == 0 {
            return Err(DevError::NoSpace);
        }

        let Some(src) = buf.get(..count) else {
            log::info!("[pcd] {} error copying data from caller", self.device.name());
            return Err(DevError::IoError);
        };
        storage[start..start + count].copy_from_slice(src);

        self.cursor = start + count;
        log::debug!(
            "[pcd] {} wrote {} bytes, position {}",
            self.device.name(),
            count,
            self.cursor
        );
        Ok(count)
    }

    /// 关闭会话
    pub fn release(self) {
        log::debug!("[pcd] {} released", self.device.name());
    }
}
