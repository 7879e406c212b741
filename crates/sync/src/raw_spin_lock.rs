//! 原始自旋锁实现
//!
//! 基于原子操作实现自旋锁机制，通过 [`lock_api::RawMutex`] 接入 `lock_api` 的 RAII 封装。

use core::{
    hint,
    sync::atomic::{AtomicBool, Ordering},
};

use lock_api::{GuardSend, RawMutex};

/// 原始自旋锁，只保存锁标志，不持有数据。
///
/// 不可重入 (即不能嵌套调用 `lock()`)。
///
/// # 示例
/// ```
/// use lock_api::RawMutex;
/// use sync::RawSpinLock;
///
/// let lock = RawSpinLock::new();
/// lock.lock();
/// assert!(!lock.try_lock());
/// // SAFETY: 当前上下文持有锁
/// unsafe { lock.unlock() };
/// ```
#[derive(Debug)]
pub struct RawSpinLock {
    lock: AtomicBool,
}

impl RawSpinLock {
    /// 创建一个新的 RawSpinLock 实例。
    pub const fn new() -> Self {
        RawSpinLock {
            lock: AtomicBool::new(false),
        }
    }
}

impl Default for RawSpinLock {
    fn default() -> Self {
        Self::new()
    }
}

// SAFETY: compare_exchange 保证同一时刻最多一个持有者，
// Acquire/Release 顺序保证临界区内的写对下一个持有者可见。
unsafe impl RawMutex for RawSpinLock {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = RawSpinLock::new();

    type GuardMarker = GuardSend;

    fn lock(&self) {
        while self
            .lock
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            // 先只读自旋，避免在争用时反复写缓存行
            while self.lock.load(Ordering::Relaxed) {
                hint::spin_loop();
            }
        }
    }

    fn try_lock(&self) -> bool {
        self.lock
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    unsafe fn unlock(&self) {
        self.lock.store(false, Ordering::Release);
    }

    fn is_locked(&self) -> bool {
        self.lock.load(Ordering::Relaxed)
    }
}
