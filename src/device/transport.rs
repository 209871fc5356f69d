//! 设备传输接口

use super::Progress;
use crate::error::Result;

/// 设备传输接口
///
/// 实现此 trait 以提供对远端设备的扇区级访问。每次调用都是一次
/// 高延迟的往返，缓存层会尽量减少调用次数。地址均为设备上的绝对地址，
/// 数据为设备上的原始形式（是否取反由缓存层处理）。
///
/// # 示例
///
/// ```rust,ignore
/// use flashio::{DeviceTransport, Progress, Result};
///
/// struct DfuLink {
///     // ...
/// }
///
/// impl DeviceTransport for DfuLink {
///     fn fetch(&mut self, address: u64, buf: &mut [u8]) -> Result<usize> {
///         // 设置地址指针并执行 UPLOAD
///         Ok(buf.len())
///     }
///
///     fn send(&mut self, address: u64, data: &[u8], progress: &dyn Progress) -> Result<()> {
///         // 擦除扇区并执行 DNLOAD
///         Ok(())
///     }
/// }
/// ```
pub trait DeviceTransport {
    /// 从设备读取
    ///
    /// # 参数
    ///
    /// * `address` - 起始绝对地址
    /// * `buf` - 目标缓冲区，长度即读取长度
    ///
    /// # 返回
    ///
    /// 成功返回实际读取的字节数
    fn fetch(&mut self, address: u64, buf: &mut [u8]) -> Result<usize>;

    /// 向设备写入
    ///
    /// # 参数
    ///
    /// * `address` - 起始绝对地址
    /// * `data` - 要写入的数据
    /// * `progress` - 进度句柄，由传输层自行决定如何上报
    fn send(&mut self, address: u64, data: &[u8], progress: &dyn Progress) -> Result<()>;
}

impl<T: DeviceTransport + ?Sized> DeviceTransport for &mut T {
    fn fetch(&mut self, address: u64, buf: &mut [u8]) -> Result<usize> {
        (**self).fetch(address, buf)
    }

    fn send(&mut self, address: u64, data: &[u8], progress: &dyn Progress) -> Result<()> {
        (**self).send(address, data, progress)
    }
}
