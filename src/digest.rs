//! 扇区内容摘要
//!
//! 只用于判断扇区内容是否发生变化，不会被持久化，也不提供密码学保证。

/// 扇区内容摘要值
pub type Digest = u32;

/// 计算扇区内容摘要（一次性计算）
///
/// # 参数
/// * `data` - 扇区数据（已解码，即取反之后的逻辑内容）
///
/// # 返回
/// CRC32 值
#[inline]
pub fn sector_digest(data: &[u8]) -> Digest {
    crc32fast::hash(data)
}
