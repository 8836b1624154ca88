//! # 错误类型模块
//!
//! 隐写核心只会产生少数几种错误，全部以 `StegError` 显式返回，绝不静默截断。

use thiserror::Error;

/// 隐写编解码过程中可能出现的错误。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StegError {
    /// 位宽不在 `1..=7` 范围内。
    #[error("invalid bit width {bit_width}: must be between 1 and 7")]
    InvalidParameter { bit_width: u8 },

    /// 载荷的位数超过了载体在该位宽下的容量。
    #[error("payload too large: needs {needed_bits} bits but only {capacity_bits} bits are available")]
    PayloadTooLarge {
        needed_bits: usize,
        capacity_bits: usize,
    },

    /// 长度前缀缺失，或声明的长度超出了可解码的字节数。
    #[error("invalid length prefix: declares {declared} bytes but only {available} bytes can be decoded")]
    InvalidLength { declared: u64, available: usize },
}

pub type Result<T> = std::result::Result<T, StegError>;
