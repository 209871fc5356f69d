//! 进度与取消句柄

use core::sync::atomic::{AtomicBool, Ordering};

/// 进度句柄
///
/// 提交循环只关心 `cancelled()`，其余进度信息由传输层在 `send` 中自行上报。
pub trait Progress {
    /// 是否已请求取消
    fn cancelled(&self) -> bool;
}

impl<P: Progress + ?Sized> Progress for &P {
    fn cancelled(&self) -> bool {
        (**self).cancelled()
    }
}

/// 永不取消的空句柄（默认）
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    #[inline]
    fn cancelled(&self) -> bool {
        false
    }
}

/// 原子取消标志
///
/// 持有共享引用即可请求取消，适合由 UI 或信号处理器触发。
///
/// ```rust,ignore
/// let flag = CancelFlag::new();
/// let mut flash = FlashIo::with_progress(link, &layout, config, &flag)?;
/// // 在别处：
/// flag.cancel();
/// ```
#[derive(Debug, Default)]
pub struct CancelFlag {
    cancelled: AtomicBool,
}

impl CancelFlag {
    /// 创建未取消的标志
    pub const fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
        }
    }

    /// 请求取消
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// 清除取消请求
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Relaxed);
    }
}

impl Progress for CancelFlag {
    fn cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
