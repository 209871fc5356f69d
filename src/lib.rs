//! flashio: 面向远端可编程设备的写回式扇区缓存
//!
//! 把只能通过粗粒度、高延迟、按扇区读写的命令访问的设备（例如 DFU 固件更新通道）
//! 映射为一段连续、可随机读写的字节卷，供文件系统使用：
//! - **按需读取**：只拉取实际访问到的扇区
//! - **延迟写回**：写入只修改内存镜像，直到显式提交
//! - **变更检测**：提交时比较内容摘要，跳过内容没有变化的扇区
//! - **取反编解码**：支持以取反形式存储数据的设备
//!
//! # 示例
//!
//! ```rust,ignore
//! use flashio::{DeviceTransport, FlashConfig, FlashIo, Progress, Result, SectorGroup, Segment};
//!
//! // 实现 DeviceTransport trait
//! struct DfuLink {
//!     // ...
//! }
//!
//! impl DeviceTransport for DfuLink {
//!     // 实现 fetch / send
//!     // ...
//! }
//!
//! fn main() -> Result<()> {
//!     let layout = vec![Segment::new(vec![SectorGroup::new(0x1000, 256, 4)])];
//!     let mut flash = FlashIo::new(DfuLink::open()?, &layout, FlashConfig::default())?;
//!
//!     flash.write(0, b"0123456789")?;
//!     flash.commit()?; // 只写回扇区 0
//!
//!     Ok(())
//! }
//! ```
//!
//! # 模块结构
//!
//! - [`error`] - 错误类型定义
//! - [`layout`] - 设备内存布局与扇区地址表
//! - [`codec`] - 位取反编解码
//! - [`device`] - 设备传输与进度接口
//! - [`cache`] - 写回式扇区缓存
//! - [`volume`] - 文件系统看到的存储卷接口

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

// ===== 核心模块 =====

/// 错误处理
pub mod error;

/// 常量定义
pub mod consts;

/// 配置与公共类型
pub mod types;

/// 设备内存布局
pub mod layout;

/// 位取反编解码
pub mod codec;

/// 设备边界
pub mod device;

/// 扇区缓存
pub mod cache;

/// 存储卷接口
pub mod volume;

/// 扇区内容摘要
pub(crate) mod digest;

// ===== 公共导出 =====

// 错误处理
pub use error::{Error, ErrorKind, Result};

// 配置
pub use types::{CommitOutcome, FlashConfig, NoClock, SystemClock};
#[cfg(feature = "std")]
pub use types::StdClock;

// 布局
pub use layout::{AddressRanges, MemoryLayout, SectorGroup, SectorRange, Segment};

// 设备
pub use device::{CancelFlag, DeviceTransport, NoProgress, Progress};

// 缓存
pub use cache::{CacheStats, FlashIo, SectorFlags, SectorState, ThroughputTracker};

// 存储卷
pub use volume::StorageVolume;
