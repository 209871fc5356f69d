//! 设备边界
//!
//! 本 crate 不实现传输协议，只定义它所依赖的外部接口：
//! device/transport.rs 提供扇区粒度的读写接口（例如基于 DFU 的 upload/download），
//! device/progress.rs 提供进度与取消句柄，提交循环在每个扇区边界轮询它。

mod progress;
mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use progress::{CancelFlag, NoProgress, Progress};
pub use transport::DeviceTransport;
