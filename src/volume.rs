//! 存储卷接口
//!
//! 文件系统看到的抽象卷：按字节寻址、可随机读写，并在 flush/close 时落盘。

use crate::cache::FlashIo;
use crate::device::{DeviceTransport, Progress};
use crate::error::Result;
use crate::types::SystemClock;

/// 存储卷接口
///
/// # 示例
///
/// ```rust,ignore
/// fn format<V: StorageVolume>(volume: &mut V) -> Result<()> {
///     let zero = vec![0u8; volume.sector_size() as usize];
///     let mut offset = 0;
///     while offset < volume.total_size() {
///         volume.write(offset, &zero)?;
///         offset += zero.len() as u64;
///     }
///     volume.flush()
/// }
/// ```
pub trait StorageVolume {
    /// 逻辑扇区大小（与设备物理扇区无关）
    fn sector_size(&self) -> u32;

    /// 卷大小（字节）
    fn total_size(&self) -> u64;

    /// 从 `offset` 读取 `buf.len()` 字节
    fn read(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize>;

    /// 向 `offset` 写入 `buf`
    fn write(&mut self, offset: u64, buf: &[u8]) -> Result<usize>;

    /// 把所有未提交的修改写回
    fn flush(&mut self) -> Result<()>;

    /// 写回并关闭，之后卷不可再用
    fn close(&mut self) -> Result<()>;

    /// 是否已关闭
    fn is_closed(&self) -> bool;

    /// 是否只读
    fn is_read_only(&self) -> bool {
        false
    }
}

impl<T: DeviceTransport, P: Progress, H: SystemClock> StorageVolume for FlashIo<T, P, H> {
    fn sector_size(&self) -> u32 {
        FlashIo::sector_size(self)
    }

    fn total_size(&self) -> u64 {
        FlashIo::total_size(self)
    }

    fn read(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        FlashIo::read(self, offset, buf)
    }

    fn write(&mut self, offset: u64, buf: &[u8]) -> Result<usize> {
        FlashIo::write(self, offset, buf)
    }

    /// 取消不是错误：已写回的扇区保持已对齐，其余留待下次
    fn flush(&mut self) -> Result<()> {
        self.commit().map(|_| ())
    }

    fn close(&mut self) -> Result<()> {
        FlashIo::close(self).map(|_| ())
    }

    fn is_closed(&self) -> bool {
        FlashIo::is_closed(self)
    }

    fn is_read_only(&self) -> bool {
        FlashIo::is_read_only(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::mock::MockTransport;
    use crate::layout::{SectorGroup, Segment};
    use crate::types::FlashConfig;
    use alloc::vec;

    fn volume() -> impl StorageVolume {
        let layout = vec![Segment::new(vec![SectorGroup::new(0x2000, 512, 8)])];
        let config = FlashConfig {
            fs_sector_size: 512,
            ..FlashConfig::default()
        };
        FlashIo::new(MockTransport::new(0x2000, 4096), &layout, config).unwrap()
    }

    #[test]
    fn test_volume_surface() {
        let mut vol = volume();
        assert_eq!(vol.sector_size(), 512);
        assert_eq!(vol.total_size(), 4096);
        assert!(!vol.is_read_only());
        assert!(!vol.is_closed());

        vol.write(1000, b"fat").unwrap();
        let mut buf = [0u8; 3];
        vol.read(1000, &mut buf).unwrap();
        assert_eq!(&buf, b"fat");

        vol.flush().unwrap();
        vol.close().unwrap();
        assert!(vol.is_closed());
    }

    #[test]
    fn test_volume_format_pattern() {
        let layout = vec![Segment::new(vec![SectorGroup::new(0x2000, 512, 8)])];
        let mut flash = FlashIo::new(MockTransport::new(0x2000, 4096), &layout, FlashConfig::default())
            .unwrap();
        flash.mark_all_cached().unwrap();

        let vol: &mut dyn StorageVolume = &mut flash;
        vol.write(0, &[0xEB, 0x3C, 0x90]).unwrap();
        vol.close().unwrap();

        assert!(flash.transport().fetches.is_empty());
        assert_eq!(flash.transport().sends.len(), 8);
        assert_eq!(&flash.transport().storage[..3], &[0xEB, 0x3C, 0x90]);
    }
}
