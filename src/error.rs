//! 错误类型定义
//!
//! 提供扇区缓存操作的错误类型。

use core::fmt;

/// 扇区缓存操作错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: &'static str,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// 地址或长度超出映射区域
    OutOfRange,
    /// 设备传输失败（读取或写入），不做重试
    Transport,
    /// 无效参数（布局或配置）
    InvalidInput,
    /// 无效状态（例如卷已关闭）
    InvalidState,
}

impl Error {
    /// 创建新错误
    pub const fn new(kind: ErrorKind, message: &'static str) -> Self {
        Self { kind, message }
    }

    /// 创建越界错误
    pub const fn out_of_range(message: &'static str) -> Self {
        Self::new(ErrorKind::OutOfRange, message)
    }

    /// 创建传输错误
    pub const fn transport(message: &'static str) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// 获取错误类型
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// 获取错误消息
    pub const fn message(&self) -> &'static str {
        self.message
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result 类型别名
pub type Result<T> = core::result::Result<T, Error>;
