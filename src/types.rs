//! 公共数据类型：配置、提交结果与时钟

use crate::consts::DEFAULT_FS_SECTOR_SIZE;
use core::time::Duration;

/// 系统时钟接口
///
/// 仅用于吞吐量诊断，不影响缓存语义。
pub trait SystemClock {
    /// 获取当前时间
    ///
    /// # 返回
    ///
    /// - `Some(Duration)` - 当前时间（相对任意固定起点）
    /// - `None` - 时间不可用（例如在没有计时器的嵌入式系统中）
    fn now() -> Option<Duration>;
}

/// 无时钟（默认），吞吐量统计只累计字节数
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClock;

impl SystemClock for NoClock {
    fn now() -> Option<Duration> {
        None
    }
}

/// 基于系统墙钟的时钟
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct StdClock;

#[cfg(feature = "std")]
impl SystemClock for StdClock {
    fn now() -> Option<Duration> {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .ok()
    }
}

/// 闪存卷配置
#[derive(Debug, Clone, Copy)]
pub struct FlashConfig {
    /// 对外暴露的卷的起始绝对地址
    ///
    /// `None` 时使用布局提供的起始地址，若布局也未提供则使用第一个扇区的地址。
    pub start_address: Option<u64>,
    /// 设备是否以取反形式存储数据
    pub invert: bool,
    /// 对外暴露的文件系统扇区大小（字节）
    pub fs_sector_size: u32,
    /// 只映射指定序号的内存段；`None` 映射全部内存段
    pub segment: Option<usize>,
}

impl Default for FlashConfig {
    fn default() -> Self {
        Self {
            start_address: None,
            invert: false,
            fs_sector_size: DEFAULT_FS_SECTOR_SIZE,
            segment: None,
        }
    }
}

/// 一次提交的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// 所有扇区都已与设备一致
    Completed {
        /// 实际写回的扇区数
        written: usize,
    },
    /// 在扇区边界观察到取消请求，剩余扇区留待下次提交
    Cancelled {
        /// 取消前写回的扇区数
        written: usize,
        /// 第一个未处理的扇区序号
        next_sector: usize,
    },
}

impl CommitOutcome {
    /// 本次提交写回的扇区数
    pub fn written(&self) -> usize {
        match *self {
            CommitOutcome::Completed { written } => written,
            CommitOutcome::Cancelled { written, .. } => written,
        }
    }

    /// 是否完整结束
    pub fn is_complete(&self) -> bool {
        matches!(self, CommitOutcome::Completed { .. })
    }
}
