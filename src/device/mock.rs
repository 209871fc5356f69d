//! 测试用的模拟设备

use super::{DeviceTransport, Progress};
use crate::error::{Error, Result};
use alloc::vec;
use alloc::vec::Vec;
use core::cell::Cell;

/// 记录每次 fetch/send 的内存设备
pub(crate) struct MockTransport {
    /// 设备内容（原始形式）
    pub storage: Vec<u8>,
    /// 设备基地址
    pub base: u64,
    /// fetch 调用记录 `(address, len)`
    pub fetches: Vec<(u64, usize)>,
    /// send 调用记录 `(address, data)`
    pub sends: Vec<(u64, Vec<u8>)>,
    /// 令所有 fetch 失败
    pub fail_fetch: bool,
    /// 令指定地址的 send 失败
    pub fail_send_at: Option<u64>,
    /// fetch 只返回这么多字节
    pub short_fetch: Option<usize>,
}

impl MockTransport {
    pub fn new(base: u64, size: usize) -> Self {
        Self::with_content(base, vec![0u8; size])
    }

    pub fn with_content(base: u64, storage: Vec<u8>) -> Self {
        Self {
            storage,
            base,
            fetches: Vec::new(),
            sends: Vec::new(),
            fail_fetch: false,
            fail_send_at: None,
            short_fetch: None,
        }
    }

    /// 被写入过的扇区地址（按调用顺序）
    pub fn sent_addresses(&self) -> Vec<u64> {
        self.sends.iter().map(|(address, _)| *address).collect()
    }

    fn offset(&self, address: u64) -> usize {
        (address - self.base) as usize
    }
}

impl DeviceTransport for MockTransport {
    fn fetch(&mut self, address: u64, buf: &mut [u8]) -> Result<usize> {
        if self.fail_fetch {
            return Err(Error::transport("mock fetch failure"));
        }
        self.fetches.push((address, buf.len()));
        let start = self.offset(address);
        let len = self.short_fetch.unwrap_or(buf.len()).min(buf.len());
        buf[..len].copy_from_slice(&self.storage[start..start + len]);
        Ok(len)
    }

    fn send(&mut self, address: u64, data: &[u8], _progress: &dyn Progress) -> Result<()> {
        if self.fail_send_at == Some(address) {
            return Err(Error::transport("mock send failure"));
        }
        self.sends.push((address, data.to_vec()));
        let start = self.offset(address);
        self.storage[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }
}

/// 被轮询若干次之后请求取消
pub(crate) struct CancelAfter {
    remaining: Cell<usize>,
}

impl CancelAfter {
    pub fn new(polls: usize) -> Self {
        Self {
            remaining: Cell::new(polls),
        }
    }
}

impl Progress for CancelAfter {
    fn cancelled(&self) -> bool {
        let left = self.remaining.get();
        if left == 0 {
            return true;
        }
        self.remaining.set(left - 1);
        false
    }
}
