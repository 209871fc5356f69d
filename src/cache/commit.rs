//! 提交（写回）算法
//!
//! 按扇区升序遍历，对每个已缓存的扇区重新计算摘要，与最近一次
//! 已持久化的摘要比较，只写回发生变化的扇区。

use super::flash_io::{mirror_span, FlashIo};
use crate::codec;
use crate::device::{DeviceTransport, Progress};
use crate::digest::sector_digest;
use crate::error::Result;
use crate::types::{CommitOutcome, SystemClock};

impl<T: DeviceTransport, P: Progress, H: SystemClock> FlashIo<T, P, H> {
    /// 把镜像与设备对齐
    ///
    /// 对每个扇区按升序：
    ///
    /// 1. 若已请求取消，立即停止，剩余扇区留待下次提交
    /// 2. 未缓存的扇区跳过（从未读写，不可能与设备不同）
    /// 3. 计算当前镜像内容的摘要
    /// 4. 与已持久化摘要相同则跳过
    /// 5. 否则按需取反后写回，成功后更新已持久化摘要
    ///
    /// 取消只在扇区边界检查，正在进行的写回不会被打断。
    ///
    /// # 返回
    ///
    /// - `Completed` - 所有扇区都已对齐
    /// - `Cancelled` - 观察到取消请求；已写回的扇区保持已对齐
    ///
    /// # 错误
    ///
    /// - `Transport` - 写回失败，不做重试；之前写回的扇区保持已对齐
    /// - `InvalidState` - 卷已关闭
    pub fn commit(&mut self) -> Result<CommitOutcome> {
        self.ensure_open()?;
        let mut written = 0;

        for (index, range) in self.ranges.iter().enumerate() {
            if self.progress.cancelled() {
                log::info!(
                    "[COMMIT] cancelled at sector {} ({:#010x}), {} sectors written",
                    index,
                    range.start,
                    written
                );
                return Ok(CommitOutcome::Cancelled {
                    written,
                    next_sector: index,
                });
            }

            let state = &mut self.states[index];
            if !state.is_cached() {
                continue;
            }

            let data = &self.mirror[mirror_span(self.base_address, range)];
            let current = sector_digest(data);
            log::trace!(
                "[COMMIT] {:#010x} persisted: {:?} current: {:#010x}",
                range.start,
                state.checksum,
                current
            );

            if !state.needs_write(current) {
                self.stats.skipped_unchanged += 1;
                continue;
            }

            log::debug!("[COMMIT] writing sector {} at {:#010x}", index, range.start);
            if self.invert {
                let encoded = codec::invert(data);
                self.transport.send(range.start, &encoded, &self.progress)?;
            } else {
                self.transport.send(range.start, data, &self.progress)?;
            }

            state.mark_persisted(current);
            self.stats.sends += 1;
            self.stats.bytes_sent += data.len() as u64;
            written += 1;
        }

        log::debug!("[COMMIT] complete, {} sectors written", written);
        Ok(CommitOutcome::Completed { written })
    }

    /// 提交并关闭卷
    ///
    /// 只有提交完整结束时卷才被标记为关闭；取消或失败时卷保持打开，
    /// 调用者可以再次尝试。对已关闭的卷重复调用不做任何事。
    pub fn close(&mut self) -> Result<CommitOutcome> {
        if self.closed {
            return Ok(CommitOutcome::Completed { written: 0 });
        }

        let outcome = self.commit()?;
        if outcome.is_complete() {
            self.closed = true;
            log::debug!("[FLASH] closed");
        }
        Ok(outcome)
    }

    /// 把所有扇区标记为已缓存，不读取设备，并清除已持久化摘要
    ///
    /// 用于格式化：调用者随后会重写整个卷，没必要先读一遍。
    /// 下次提交会无条件写回每个扇区，未被写入的扇区以镜像中的零填充内容写回。
    pub fn mark_all_cached(&mut self) -> Result<()> {
        self.ensure_open()?;
        for state in self.states.iter_mut() {
            state.mark_cached();
            state.checksum = None;
        }
        log::debug!("[FLASH] all {} sectors marked cached", self.states.len());
        Ok(())
    }

    /// 下次提交将写回的扇区数量
    pub fn pending_sectors(&self) -> usize {
        self.ranges
            .iter()
            .zip(self.states.iter())
            .filter(|(range, state)| {
                state.is_cached()
                    && state.needs_write(sector_digest(
                        &self.mirror[mirror_span(self.base_address, range)],
                    ))
            })
            .count()
    }
}
