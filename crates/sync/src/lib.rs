//! 同步原语
//!
//! 向设备层提供基本的互斥锁：
//!
//! - [`RawSpinLock`] - 基于原子操作的原始自旋锁，实现 [`lock_api::RawMutex`]
//! - [`SpinLock`] - 在 [`RawSpinLock`] 之上由 `lock_api` 生成的数据锁
//!
//! 锁是非可重入的；同一线程嵌套获取同一把锁会死锁。

#![no_std]

mod raw_spin_lock;
mod spin_lock;

pub use raw_spin_lock::*;
pub use spin_lock::*;
