//! 扇区状态
//!
//! 每个扇区一项，与扇区地址表按序号一一对应。

use crate::digest::Digest;
use bitflags::bitflags;

bitflags! {
    /// 扇区状态标志
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SectorFlags: u8 {
        /// 镜像中的内容可信（已从设备读取，或由调用者写入）
        const CACHED   = 0x01;
        /// 镜像内容来自设备读取
        const FETCHED  = 0x02;
    }
}

/// 单个扇区的缓存状态
///
/// - `flags`: 是否已缓存、内容来源
/// - `checksum`: 最近一次确认已持久化到设备的内容摘要。
///   `None` 表示未知，下次提交必须写回。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SectorState {
    /// 状态标志
    pub flags: SectorFlags,
    /// 已持久化内容的摘要
    pub checksum: Option<Digest>,
}

impl SectorState {
    /// 是否已缓存
    pub fn is_cached(&self) -> bool {
        self.flags.contains(SectorFlags::CACHED)
    }

    /// 内容是否来自设备
    pub fn is_fetched(&self) -> bool {
        self.flags.contains(SectorFlags::FETCHED)
    }

    /// 标记为已缓存
    pub fn mark_cached(&mut self) {
        self.flags.insert(SectorFlags::CACHED);
    }

    /// 记录一次成功的设备读取
    pub fn mark_fetched(&mut self, checksum: Digest) {
        self.flags.insert(SectorFlags::CACHED | SectorFlags::FETCHED);
        self.checksum = Some(checksum);
    }

    /// 记录一次成功的写回
    pub fn mark_persisted(&mut self, checksum: Digest) {
        self.checksum = Some(checksum);
    }

    /// 当前内容摘要为 `current` 时是否需要写回
    pub fn needs_write(&self, current: Digest) -> bool {
        self.is_cached() && self.checksum != Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = SectorState::default();
        assert!(!state.is_cached());
        assert!(!state.is_fetched());
        assert_eq!(state.checksum, None);
        // 未缓存的扇区永远不需要写回
        assert!(!state.needs_write(0));
    }

    #[test]
    fn test_fetched_state() {
        let mut state = SectorState::default();
        state.mark_fetched(0xAB);

        assert!(state.is_cached());
        assert!(state.is_fetched());
        assert!(!state.needs_write(0xAB));
        assert!(state.needs_write(0xCD));
    }

    #[test]
    fn test_cached_without_checksum_always_writes() {
        let mut state = SectorState::default();
        state.mark_cached();

        assert!(state.is_cached());
        assert!(!state.is_fetched());
        assert!(state.needs_write(0));
        assert!(state.needs_write(0xFFFF_FFFF));

        state.mark_persisted(7);
        assert!(!state.needs_write(7));
    }
}
