//! 缓存统计信息

use core::time::Duration;

/// 缓存统计信息
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// 逻辑读取次数
    pub reads: u64,
    /// 逻辑写入次数
    pub writes: u64,
    /// 设备读取次数（实际设备操作）
    pub fetches: u64,
    /// 设备读取字节数
    pub bytes_fetched: u64,
    /// 设备写回次数（实际设备操作）
    pub sends: u64,
    /// 设备写回字节数
    pub bytes_sent: u64,
    /// 因内容未变化而跳过的写回次数
    pub skipped_unchanged: u64,
}

impl CacheStats {
    /// 写回节省率
    ///
    /// 返回 0.0 到 1.0 之间的值，表示提交时被跳过的已缓存扇区比例
    pub fn write_savings(&self) -> f64 {
        let considered = self.sends + self.skipped_unchanged;
        if considered == 0 {
            0.0
        } else {
            self.skipped_unchanged as f64 / considered as f64
        }
    }
}

/// 设备读取吞吐量统计
///
/// 只在时钟可用时累计耗时；否则只累计字节数。
#[derive(Debug, Clone, Default)]
pub struct ThroughputTracker {
    total_bytes: u64,
    total_time: Duration,
    timed_bytes: u64,
}

impl ThroughputTracker {
    /// 创建空统计
    pub const fn new() -> Self {
        Self {
            total_bytes: 0,
            total_time: Duration::ZERO,
            timed_bytes: 0,
        }
    }

    /// 记录一次传输
    ///
    /// # 参数
    ///
    /// * `bytes` - 传输字节数
    /// * `elapsed` - 耗时；时钟不可用时为 `None`
    pub fn record(&mut self, bytes: u64, elapsed: Option<Duration>) {
        self.total_bytes += bytes;
        if let Some(elapsed) = elapsed {
            self.total_time += elapsed;
            self.timed_bytes += bytes;
        }
    }

    /// 累计传输字节数
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// 累计耗时
    pub fn total_time(&self) -> Duration {
        self.total_time
    }

    /// 平均吞吐量（字节/秒）
    ///
    /// 没有计时样本或累计耗时为 0 时返回 `None`
    pub fn average_rate(&self) -> Option<f64> {
        rate(self.timed_bytes, self.total_time)
    }
}

/// 计算吞吐量（字节/秒）
pub(crate) fn rate(bytes: u64, elapsed: Duration) -> Option<f64> {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        Some(bytes as f64 / secs)
    } else {
        None
    }
}
