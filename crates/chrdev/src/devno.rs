//! 设备号
//!
//! 采用 Linux `dev_t` 的编码方式：major 12 位在 `[8, 20)`，其余高位在 `[44, 64)`；
//! minor 低 8 位在 `[0, 8)`，其余高位在 `[20, 44)`。

/// 由 major/minor 组合设备号
pub const fn makedev(major: u32, minor: u32) -> u64 {
    let major = major as u64;
    let minor = minor as u64;
    ((major & 0xffff_f000) << 32)
        | ((major & 0x0000_0fff) << 8)
        | ((minor & 0xffff_ff00) << 12)
        | (minor & 0x0000_00ff)
}

/// 取设备号的 major 部分
pub const fn major(dev: u64) -> u32 {
    (((dev >> 32) & 0xffff_f000) | ((dev >> 8) & 0x0000_0fff)) as u32
}

/// 取设备号的 minor 部分
pub const fn minor(dev: u64) -> u32 {
    (((dev >> 12) & 0xffff_ff00) | (dev & 0x0000_00ff)) as u32
}

/// 一段连续分配的设备号：同一 major 下 `count` 个相邻 minor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DevRange {
    base: u64,
    count: u32,
}

impl DevRange {
    /// 以首个设备号和数量构造区间
    pub const fn new(base: u64, count: u32) -> Self {
        Self { base, count }
    }

    /// 首个设备号
    pub const fn base(&self) -> u64 {
        self.base
    }

    /// 区间内设备号数量
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// 区间的 major
    pub const fn major(&self) -> u32 {
        major(self.base)
    }

    /// 第 `index` 个设备号，越界返回 `None`
    pub fn nth(&self, index: u32) -> Option<u64> {
        if index >= self.count {
            return None;
        }
        let first = minor(self.base);
        let minor = first.checked_add(index)?;
        Some(makedev(self.major(), minor))
    }

    /// 设备号在区间内的下标
    pub fn index_of(&self, dev: u64) -> Option<usize> {
        if major(dev) != self.major() {
            return None;
        }
        let offset = minor(dev).checked_sub(minor(self.base))?;
        if offset < self.count {
            Some(offset as usize)
        } else {
            None
        }
    }

    /// 设备号是否落在区间内
    pub fn contains(&self, dev: u64) -> bool {
        self.index_of(dev).is_some()
    }
}
