//! 扇区地址表
//!
//! 把设备的线性地址空间划分为有序、互不重叠、首尾相接的扇区区间，
//! 并通过二分查找回答"地址 X 位于哪个扇区"。

use super::Segment;
use crate::error::{Error, ErrorKind, Result};
use alloc::vec::Vec;

/// 单个扇区的地址区间 `[start, start + size)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorRange {
    /// 起始地址（绝对地址）
    pub start: u64,
    /// 扇区大小（字节）
    pub size: u32,
    /// 扇区序号
    pub index: usize,
}

impl SectorRange {
    /// 结束地址（不包含）
    pub const fn end(&self) -> u64 {
        self.start + self.size as u64
    }

    /// 地址是否落在本扇区内
    pub const fn contains(&self, address: u64) -> bool {
        address >= self.start && address < self.end()
    }
}

/// 扇区地址表
///
/// 构造后不可变。所有扇区按起始地址升序排列且首尾相接，
/// 覆盖区间恰好为 `[base(), end())`。
#[derive(Debug, Clone)]
pub struct AddressRanges {
    ranges: Vec<SectorRange>,
}

impl AddressRanges {
    /// 由内存段构建扇区表
    ///
    /// 每个扇区组展开为 `count` 个大小为 `size` 的连续扇区。
    ///
    /// # 错误
    ///
    /// - 没有任何内存段，或展开后扇区数为 0
    /// - 扇区大小为 0
    /// - 扇区组之间存在空洞或重叠
    /// - 地址溢出
    pub fn build(segments: &[Segment]) -> Result<Self> {
        if segments.is_empty() {
            log::error!("[LAYOUT] no memory segments supplied");
            return Err(Error::new(ErrorKind::InvalidInput, "Device layout has no segments"));
        }

        let mut ranges: Vec<SectorRange> = Vec::new();

        for group in segments.iter().flat_map(|segment| segment.groups.iter()) {
            if group.size == 0 {
                log::error!("[LAYOUT] zero-sized sector group at {:#x}", group.start);
                return Err(Error::new(ErrorKind::InvalidInput, "Sector size must be non-zero"));
            }

            if let Some(last) = ranges.last() {
                if group.count > 0 && last.end() != group.start {
                    log::error!(
                        "[LAYOUT] sector group at {:#x} does not follow previous end {:#x}",
                        group.start,
                        last.end()
                    );
                    return Err(Error::new(
                        ErrorKind::InvalidInput,
                        "Sector groups must be contiguous",
                    ));
                }
            }

            let mut start = group.start;
            for _ in 0..group.count {
                let range = SectorRange {
                    start,
                    size: group.size,
                    index: ranges.len(),
                };
                start = start.checked_add(group.size as u64).ok_or(Error::new(
                    ErrorKind::InvalidInput,
                    "Sector group overflows the address space",
                ))?;
                ranges.push(range);
            }
        }

        if ranges.is_empty() {
            log::error!("[LAYOUT] layout produced no sectors");
            return Err(Error::new(ErrorKind::InvalidInput, "Device layout has no sectors"));
        }

        let table = Self { ranges };
        log::debug!(
            "[LAYOUT] {} sectors mapped at [{:#x}, {:#x})",
            table.len(),
            table.base(),
            table.end()
        );
        Ok(table)
    }

    /// 第一个扇区的起始地址
    pub fn base(&self) -> u64 {
        self.ranges[0].start
    }

    /// 最后一个扇区的结束地址（不包含）
    pub fn end(&self) -> u64 {
        self.ranges[self.ranges.len() - 1].end()
    }

    /// 映射区域总字节数
    pub fn total_size(&self) -> u64 {
        self.end() - self.base()
    }

    /// 扇区数量
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// 是否为空（构造成功的表永远非空）
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// 按序号获取扇区
    pub fn get(&self, index: usize) -> Option<&SectorRange> {
        self.ranges.get(index)
    }

    /// 按地址顺序遍历所有扇区
    pub fn iter(&self) -> core::slice::Iter<'_, SectorRange> {
        self.ranges.iter()
    }

    /// 查找包含 `address` 的扇区序号
    ///
    /// 扇区表有序，使用二分查找。
    ///
    /// # 错误
    ///
    /// 地址不在 `[base(), end())` 内时返回 `OutOfRange`
    pub fn index_of(&self, address: u64) -> Result<usize> {
        if address < self.base() || address >= self.end() {
            return Err(Error::out_of_range("Address outside mapped region"));
        }

        // 第一个起始地址大于 address 的扇区的前一个
        let index = self.ranges.partition_point(|range| range.start <= address) - 1;
        debug_assert!(self.ranges[index].contains(address));
        Ok(index)
    }
}
