//! 写回式扇区缓存
//!
//! # 主要组件
//!
//! - [`FlashIo`] - 闪存卷：内存镜像 + 按需读取 + 延迟写回
//! - [`SectorState`] - 单个扇区的缓存状态（是否已缓存、已持久化摘要）
//! - [`SectorFlags`] - 扇区状态标志
//! - [`CacheStats`] - 缓存统计信息
//! - [`ThroughputTracker`] - 设备读取吞吐量
//!
//! # 设计原理
//!
//! 整个设备地址空间在内存中有一份镜像，扇区只在首次被读取或写入覆盖时
//! 从设备拉取。写入只修改镜像。提交时对每个已缓存扇区重新计算摘要，
//! 只有与最近一次已持久化摘要不同的扇区才写回设备：
//!
//! | 扇区经历               | 提交时                 |
//! |------------------------|------------------------|
//! | 从未访问               | 跳过（未缓存）         |
//! | 只读取                 | 跳过（摘要相同）       |
//! | 写入后又改回原内容     | 跳过（摘要相同）       |
//! | 写入了不同内容         | 写回                   |
//! | `mark_all_cached()`    | 写回（无已持久化摘要） |
//!
//! # 使用示例
//!
//! ```rust,ignore
//! use flashio::{FlashConfig, FlashIo, SectorGroup, Segment};
//!
//! let layout = vec![Segment::new(vec![SectorGroup::new(0x0800_0000, 2048, 64)])];
//! let config = FlashConfig { invert: true, ..FlashConfig::default() };
//! let mut flash = FlashIo::new(link, &layout, config)?;
//!
//! let mut boot = [0u8; 512];
//! flash.read(0, &mut boot)?;
//! boot[510] = 0x55;
//! boot[511] = 0xAA;
//! flash.write(0, &boot)?;
//!
//! let outcome = flash.close()?;
//! println!("{} sectors written", outcome.written());
//! ```

mod commit;
mod flash_io;
mod state;
mod stats;

pub use flash_io::FlashIo;
pub use state::{SectorFlags, SectorState};
pub use stats::{CacheStats, ThroughputTracker};
