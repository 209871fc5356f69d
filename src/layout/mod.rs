//! 设备内存布局
//!
//! 布局的发现（例如解析 DFU 描述符）由外部完成，这里只定义布局描述类型，
//! 以及把布局展开为有序扇区表的 [`AddressRanges`]。
//!
//! - [`SectorGroup`] - 一组大小相同、连续排列的扇区
//! - [`Segment`] - 一个内存段，包含若干扇区组
//! - [`MemoryLayout`] - 布局提供者接口
//! - [`AddressRanges`] - 扇区地址表，支持二分查找

mod ranges;

pub use ranges::{AddressRanges, SectorRange};

use alloc::vec::Vec;

/// 扇区组描述符
///
/// 从 `start` 开始的 `count` 个大小为 `size` 字节的连续扇区。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorGroup {
    /// 组起始地址（绝对地址）
    pub start: u64,
    /// 单个扇区大小（字节）
    pub size: u32,
    /// 扇区数量
    pub count: u32,
}

impl SectorGroup {
    /// 创建扇区组描述符
    pub const fn new(start: u64, size: u32, count: u32) -> Self {
        Self { start, size, count }
    }

    /// 组的总字节数
    pub const fn len(&self) -> u64 {
        self.size as u64 * self.count as u64
    }

    /// 组是否不包含任何字节
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 内存段
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Segment {
    /// 按地址排列的扇区组
    pub groups: Vec<SectorGroup>,
}

impl Segment {
    /// 由扇区组创建内存段
    pub fn new(groups: Vec<SectorGroup>) -> Self {
        Self { groups }
    }
}

/// 设备布局提供者
///
/// # 示例
///
/// ```rust,ignore
/// struct Stm32Layout {
///     segments: Vec<Segment>,
/// }
///
/// impl MemoryLayout for Stm32Layout {
///     fn segments(&self) -> &[Segment] {
///         &self.segments
///     }
///
///     fn start_address(&self) -> Option<u64> {
///         Some(0x0800_0000)
///     }
/// }
/// ```
pub trait MemoryLayout {
    /// 按地址排列的内存段
    fn segments(&self) -> &[Segment];

    /// 映射内存的起始地址
    ///
    /// 默认返回 `None`，此时使用第一个扇区的地址。
    fn start_address(&self) -> Option<u64> {
        None
    }
}

impl MemoryLayout for [Segment] {
    fn segments(&self) -> &[Segment] {
        self
    }
}

impl MemoryLayout for Vec<Segment> {
    fn segments(&self) -> &[Segment] {
        self
    }
}

impl<L: MemoryLayout + ?Sized> MemoryLayout for &L {
    fn segments(&self) -> &[Segment] {
        (**self).segments()
    }

    fn start_address(&self) -> Option<u64> {
        (**self).start_address()
    }
}
