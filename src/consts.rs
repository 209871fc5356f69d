//! 常量定义

/// 文件系统逻辑扇区大小默认值（字节）
///
/// 与设备物理扇区大小无关，只影响对外暴露的卷。
pub const DEFAULT_FS_SECTOR_SIZE: u32 = 4096;

/// 字节取反掩码
pub const INVERT_MASK: u8 = 0xFF;
