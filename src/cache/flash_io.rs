//! 闪存卷核心类型与读写路径
//!
//! cache/flash_io.rs 提供镜像缓冲区、按需读取和写入暂存；
//! cache/commit.rs 提供提交（写回）算法。

use super::state::SectorState;
use super::stats::{rate, CacheStats, ThroughputTracker};
use crate::codec;
use crate::device::{DeviceTransport, NoProgress, Progress};
use crate::digest::sector_digest;
use crate::error::{Error, ErrorKind, Result};
use crate::layout::{AddressRanges, MemoryLayout, SectorRange};
use crate::types::{FlashConfig, NoClock, SystemClock};
use alloc::vec;
use alloc::vec::Vec;
use core::marker::PhantomData;
use core::ops::{Range, RangeInclusive};

/// 写回式闪存卷
///
/// 把远端设备的地址空间映射为一段连续、可随机读写的字节卷：
/// 读取时只拉取实际访问到的扇区，写入只修改内存镜像，
/// 直到 [`commit`](FlashIo::commit) 时才把内容发生变化的扇区写回设备。
///
/// # 泛型参数
///
/// - `T` - 设备传输层
/// - `P` - 进度与取消句柄，提交循环在每个扇区边界轮询
/// - `H` - 时钟，仅用于吞吐量诊断
///
/// # 并发使用
///
/// FlashIo 不包含内部锁，所有操作都需要 `&mut self`，在调用线程上同步完成。
/// 多线程共享时由调用者自行包装（例如 `Mutex<FlashIo<..>>`）。
///
/// # 示例
///
/// ```rust,ignore
/// let layout = vec![Segment::new(vec![SectorGroup::new(0x1000, 256, 4)])];
/// let mut flash = FlashIo::new(link, &layout, FlashConfig::default())?;
///
/// flash.write(0, b"hello")?;       // 只读取扇区 0，不写设备
/// let outcome = flash.commit()?;   // 写回扇区 0
/// ```
pub struct FlashIo<T, P = NoProgress, H = NoClock> {
    /// 设备传输层
    pub(super) transport: T,
    /// 进度与取消句柄
    pub(super) progress: P,
    /// 扇区地址表
    pub(super) ranges: AddressRanges,
    /// 设备地址空间的内存镜像，按 `绝对地址 - base_address` 索引
    pub(super) mirror: Vec<u8>,
    /// 扇区状态，与 `ranges` 按序号对应
    pub(super) states: Vec<SectorState>,
    /// 第一个扇区的绝对地址
    pub(super) base_address: u64,
    /// 卷的起始位置相对 `base_address` 的偏移
    pub(super) start_offset: u64,
    /// 设备是否以取反形式存储
    pub(super) invert: bool,
    /// 对外暴露的扇区大小
    pub(super) fs_sector_size: u32,
    /// 卷是否已关闭
    pub(super) closed: bool,
    /// 统计信息
    pub(super) stats: CacheStats,
    /// 设备读取吞吐量
    pub(super) throughput: ThroughputTracker,
    _clock: PhantomData<H>,
}

impl<T: DeviceTransport> FlashIo<T> {
    /// 创建闪存卷（无进度句柄，无时钟）
    ///
    /// # 参数
    ///
    /// * `transport` - 设备传输层
    /// * `layout` - 设备内存布局
    /// * `config` - 卷配置
    pub fn new<L: MemoryLayout + ?Sized>(
        transport: T,
        layout: &L,
        config: FlashConfig,
    ) -> Result<Self> {
        Self::open(transport, layout, config, NoProgress)
    }
}

impl<T: DeviceTransport, P: Progress> FlashIo<T, P> {
    /// 创建带进度句柄的闪存卷
    pub fn with_progress<L: MemoryLayout + ?Sized>(
        transport: T,
        layout: &L,
        config: FlashConfig,
        progress: P,
    ) -> Result<Self> {
        Self::open(transport, layout, config, progress)
    }
}

impl<T: DeviceTransport, P: Progress, H: SystemClock> FlashIo<T, P, H> {
    /// 创建闪存卷
    ///
    /// 构建扇区地址表并分配整个映射区域的镜像缓冲区，不访问设备。
    ///
    /// # 错误
    ///
    /// - `InvalidInput` - 布局无效、内存段序号越界、扇区大小为 0
    /// - `OutOfRange` - 起始地址不在映射区域内
    pub fn open<L: MemoryLayout + ?Sized>(
        transport: T,
        layout: &L,
        config: FlashConfig,
        progress: P,
    ) -> Result<Self> {
        if config.fs_sector_size == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Filesystem sector size must be non-zero",
            ));
        }

        let segments = layout.segments();
        let selected = match config.segment {
            Some(index) => segments.get(index..=index).ok_or(Error::new(
                ErrorKind::InvalidInput,
                "Segment index out of range",
            ))?,
            None => segments,
        };
        let ranges = AddressRanges::build(selected)?;

        let base_address = ranges.base();
        let start_address = config
            .start_address
            .or_else(|| layout.start_address())
            .unwrap_or(base_address);
        if start_address < base_address || start_address >= ranges.end() {
            log::error!(
                "[FLASH] start address {:#x} outside mapped region [{:#x}, {:#x})",
                start_address,
                base_address,
                ranges.end()
            );
            return Err(Error::out_of_range("Start address outside mapped region"));
        }

        let mirror_len = usize::try_from(ranges.total_size()).map_err(|_| {
            Error::new(ErrorKind::InvalidInput, "Mapped region too large for memory")
        })?;

        log::debug!(
            "[FLASH] open: {} sectors, base={:#x}, start={:#x}, size={}, invert={}",
            ranges.len(),
            base_address,
            start_address,
            mirror_len,
            config.invert
        );

        Ok(Self {
            transport,
            progress,
            states: vec![SectorState::default(); ranges.len()],
            ranges,
            mirror: vec![0u8; mirror_len],
            base_address,
            start_offset: start_address - base_address,
            invert: config.invert,
            fs_sector_size: config.fs_sector_size,
            closed: false,
            stats: CacheStats::default(),
            throughput: ThroughputTracker::new(),
            _clock: PhantomData,
        })
    }

    /// 替换进度句柄
    pub fn set_progress(&mut self, progress: P) {
        self.progress = progress;
    }

    /// 获取进度句柄
    pub fn progress(&self) -> &P {
        &self.progress
    }

    /// 获取传输层的引用
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// 获取传输层的可变引用
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// 对外暴露的扇区大小
    pub fn sector_size(&self) -> u32 {
        self.fs_sector_size
    }

    /// 对外暴露的卷大小（字节）
    pub fn total_size(&self) -> u64 {
        self.mirror.len() as u64 - self.start_offset
    }

    /// 第一个扇区的绝对地址
    pub fn base_address(&self) -> u64 {
        self.base_address
    }

    /// 卷起始位置相对第一个扇区的偏移
    pub fn start_offset(&self) -> u64 {
        self.start_offset
    }

    /// 设备扇区数量
    pub fn device_sector_count(&self) -> usize {
        self.ranges.len()
    }

    /// 扇区地址表
    pub fn ranges(&self) -> &AddressRanges {
        &self.ranges
    }

    /// 扇区是否已缓存
    pub fn is_cached(&self, index: usize) -> bool {
        self.states.get(index).map(|s| s.is_cached()).unwrap_or(false)
    }

    /// 卷永远可写
    pub fn is_read_only(&self) -> bool {
        false
    }

    /// 卷是否已关闭
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// 获取缓存统计信息
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// 获取设备读取吞吐量统计
    pub fn throughput(&self) -> &ThroughputTracker {
        &self.throughput
    }

    /// 读取字节
    ///
    /// 先按升序确保涉及的每个扇区都已缓存，再从镜像复制。
    /// 返回的数据等于设备内容叠加本实例上尚未提交的写入。
    ///
    /// # 参数
    ///
    /// * `offset` - 卷内字节偏移
    /// * `buf` - 目标缓冲区，长度即读取长度
    ///
    /// # 返回
    ///
    /// 成功返回读取的字节数
    ///
    /// # 错误
    ///
    /// - `OutOfRange` - 请求超出卷范围
    /// - `Transport` - 设备读取失败
    /// - `InvalidState` - 卷已关闭
    pub fn read(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        self.ensure_open()?;
        let span = self.translate(offset, buf.len())?;
        self.stats.reads += 1;

        if span.is_empty() {
            return Ok(0);
        }

        for index in self.sector_span(&span)? {
            self.ensure_cached(index)?;
        }

        buf.copy_from_slice(&self.mirror[span]);
        Ok(buf.len())
    }

    /// 写入字节
    ///
    /// 只修改内存镜像，设备在提交前不会被写入。写入可能只覆盖扇区的一部分，
    /// 所以涉及的每个扇区都先读入缓存，保证扇区内未被覆盖的字节保持原值。
    ///
    /// # 参数
    ///
    /// * `offset` - 卷内字节偏移
    /// * `buf` - 源数据
    ///
    /// # 返回
    ///
    /// 成功返回写入的字节数
    ///
    /// # 错误
    ///
    /// 与 [`read`](FlashIo::read) 相同
    pub fn write(&mut self, offset: u64, buf: &[u8]) -> Result<usize> {
        self.ensure_open()?;
        let span = self.translate(offset, buf.len())?;
        self.stats.writes += 1;

        if span.is_empty() {
            return Ok(0);
        }

        let sectors = self.sector_span(&span)?;
        for index in sectors.clone() {
            self.ensure_cached(index)?;
        }

        self.mirror[span].copy_from_slice(buf);

        // 摘要保持不变，是否需要写回在提交时重新计算
        for index in sectors {
            self.states[index].mark_cached();
        }
        Ok(buf.len())
    }

    /// 确保扇区已缓存
    ///
    /// 未缓存时从设备读取，按需取反，写入镜像，并记录解码后内容的摘要。
    /// 这是读取路径上唯一访问设备的地方。
    pub(crate) fn ensure_cached(&mut self, index: usize) -> Result<()> {
        let range = *self
            .ranges
            .get(index)
            .ok_or(Error::out_of_range("Sector index out of range"))?;
        let cached = self.states[index].is_cached();
        log::trace!("[FLASH] cache check {:#010x}: cached={}", range.start, cached);
        if cached {
            return Ok(());
        }

        let span = mirror_span(self.base_address, &range);
        let expected = span.len();

        let started = H::now();
        let fetched = self.transport.fetch(range.start, &mut self.mirror[span.clone()])?;
        let elapsed = match (started, H::now()) {
            (Some(start), Some(end)) => Some(end.saturating_sub(start)),
            _ => None,
        };

        if fetched != expected {
            log::error!(
                "[FLASH] short read at {:#010x}: {} of {} bytes",
                range.start,
                fetched,
                expected
            );
            return Err(Error::transport("Short read from device"));
        }

        self.throughput.record(expected as u64, elapsed);
        self.stats.fetches += 1;
        self.stats.bytes_fetched += expected as u64;

        if let (Some(current), Some(average)) = (
            elapsed.and_then(|e| rate(expected as u64, e)),
            self.throughput.average_rate(),
        ) {
            log::trace!("[FLASH] Bytes/sec: {:.1} Avg: {:.1}", current, average);
        }

        let data = &mut self.mirror[span];
        if self.invert {
            codec::invert_in_place(data);
        }
        let checksum = sector_digest(data);
        self.states[index].mark_fetched(checksum);

        log::debug!(
            "[FLASH] fetched sector {} at {:#010x} ({} bytes), checksum={:#010x}",
            index,
            range.start,
            expected,
            checksum
        );
        Ok(())
    }

    /// 关闭后的操作返回 `InvalidState`
    pub(super) fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::new(ErrorKind::InvalidState, "Volume is closed"));
        }
        Ok(())
    }

    /// 把卷内 `[offset, offset + len)` 转换为镜像下标区间
    fn translate(&self, offset: u64, len: usize) -> Result<Range<usize>> {
        let start = self
            .start_offset
            .checked_add(offset)
            .ok_or(Error::out_of_range("Offset overflows address space"))?;
        let end = start
            .checked_add(len as u64)
            .ok_or(Error::out_of_range("Length overflows address space"))?;

        if end > self.mirror.len() as u64 {
            log::warn!(
                "[FLASH] request [{:#x}, {:#x}) beyond mapped size {:#x}",
                start,
                end,
                self.mirror.len()
            );
            return Err(Error::out_of_range("Request beyond end of volume"));
        }

        Ok(start as usize..end as usize)
    }

    /// 与非空镜像区间重叠的扇区序号（闭区间）
    fn sector_span(&self, span: &Range<usize>) -> Result<RangeInclusive<usize>> {
        let first = self.ranges.index_of(self.base_address + span.start as u64)?;
        let last = self.ranges.index_of(self.base_address + span.end as u64 - 1)?;
        Ok(first..=last)
    }
}

/// 扇区在镜像中的下标区间
pub(super) fn mirror_span(base_address: u64, range: &SectorRange) -> Range<usize> {
    let start = (range.start - base_address) as usize;
    start..start + range.size as usize
}

impl<T, P, H> core::fmt::Debug for FlashIo<T, P, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlashIo")
            .field("base_address", &self.base_address)
            .field("start_offset", &self.start_offset)
            .field("size", &self.mirror.len())
            .field("sectors", &self.ranges.len())
            .field("cached", &self.states.iter().filter(|s| s.is_cached()).count())
            .field("invert", &self.invert)
            .field("closed", &self.closed)
            .field("stats", &self.stats)
            .finish()
    }
}
