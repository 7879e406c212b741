//! open(2) 标志位与 lseek(2) 参考点

use bitflags::bitflags;

use crate::errno::EINVAL;

bitflags! {
    /// open(2) 的标志位
    ///
    /// 访问模式占用最低两位（`O_ACCMODE`），`O_RDONLY` 为 0，因此不能用
    /// `contains` 判断只读，应使用 [`OpenFlags::readable`] / [`OpenFlags::writable`]。
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenFlags: u32 {
        const O_RDONLY = 0o0;
        const O_WRONLY = 0o1;
        const O_RDWR = 0o2;
        const O_ACCMODE = 0o3;
        const O_CREAT = 0o100;
        const O_EXCL = 0o200;
        const O_NOCTTY = 0o400;
        const O_TRUNC = 0o1000;
        const O_APPEND = 0o2000;
        const O_NONBLOCK = 0o4000;
        const O_SYNC = 0o4010000;
        const O_CLOEXEC = 0o2000000;
    }
}

impl OpenFlags {
    /// 取出访问模式位
    pub fn access_mode(&self) -> u32 {
        self.bits() & Self::O_ACCMODE.bits()
    }

    /// 访问模式是否允许读
    ///
    /// `O_ACCMODE` 值为 3 时（Linux 的“无读写”特殊模式）既不可读也不可写。
    pub fn readable(&self) -> bool {
        matches!(self.access_mode(), 0 | 2)
    }

    /// 访问模式是否允许写
    pub fn writable(&self) -> bool {
        matches!(self.access_mode(), 1 | 2)
    }
}

/// lseek(2) 的原始参考点取值
pub const SEEK_SET: i32 = 0;
pub const SEEK_CUR: i32 = 1;
pub const SEEK_END: i32 = 2;

/// lseek 参考点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekWhence {
    /// 相对文件起始位置
    Set,
    /// 相对当前位置
    Cur,
    /// 相对文件末尾
    End,
}

impl TryFrom<i32> for SeekWhence {
    /// 失败时返回 `EINVAL`
    type Error = i32;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        match raw {
            SEEK_SET => Ok(SeekWhence::Set),
            SEEK_CUR => Ok(SeekWhence::Cur),
            SEEK_END => Ok(SeekWhence::End),
            _ => Err(EINVAL),
        }
    }
}

impl From<SeekWhence> for i32 {
    fn from(whence: SeekWhence) -> Self {
        match whence {
            SeekWhence::Set => SEEK_SET,
            SeekWhence::Cur => SEEK_CUR,
            SeekWhence::End => SEEK_END,
        }
    }
}
