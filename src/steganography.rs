//! # 隐写核心模块
//!
//! 容量计算、多位 LSB 嵌入与提取。所有函数都是纯函数，不保留任何状态，
//! 可以在多个线程中对互不相关的缓冲区并行调用。

use crate::bits::{BitGroups, regroup};
use crate::constants::MAX_BIT_WIDTH;
use crate::error::{Result, StegError};

/// 每个采样中用于承载数据的最低有效位数量，保证位于 `1..=7`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BitWidth(u8);

impl BitWidth {
    /// 校验并构造位宽。
    ///
    /// # Errors
    ///
    /// `bits` 为 0 或大于 7 时返回 [`StegError::InvalidParameter`]。
    pub fn new(bits: u8) -> Result<Self> {
        if (1..=MAX_BIT_WIDTH).contains(&bits) {
            Ok(Self(bits))
        } else {
            Err(StegError::InvalidParameter { bit_width: bits })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// 清除低位时使用的掩码，即 `(0xFF << w) & 0xFF`。
    pub fn keep_mask(self) -> u8 {
        0xFF << self.0
    }

    /// 读取低位时使用的掩码，即 `(1 << w) - 1`。
    pub fn data_mask(self) -> u8 {
        !self.keep_mask()
    }
}

impl TryFrom<u8> for BitWidth {
    type Error = StegError;

    fn try_from(bits: u8) -> Result<Self> {
        Self::new(bits)
    }
}

/// 计算 `sample_count` 个采样在给定位宽下最多能承载的位数。
pub fn capacity_bits(sample_count: usize, bit_width: u8) -> Result<usize> {
    let width = BitWidth::new(bit_width)?;
    Ok(sample_count.saturating_mul(usize::from(width.get())))
}

/// 把 `payload` 嵌入 `samples` 的低位，返回一个新的采样缓冲区。
///
/// 载荷按字节高位优先展开，每 `bit_width` 位写入一个采样；
/// 未用到的采样原样复制。调用方的缓冲区不会被修改。
///
/// # Errors
///
/// * 位宽非法时返回 [`StegError::InvalidParameter`]。
/// * 载荷位数超过容量时返回 [`StegError::PayloadTooLarge`]，此时不会写入任何数据。
pub fn embed(samples: &[u8], payload: &[u8], bit_width: u8) -> Result<Vec<u8>> {
    let width = BitWidth::new(bit_width)?;
    let capacity_bits = capacity_bits(samples.len(), bit_width)?;
    let needed_bits = payload.len().saturating_mul(8);

    if needed_bits > capacity_bits {
        return Err(StegError::PayloadTooLarge {
            needed_bits,
            capacity_bits,
        });
    }

    let mut stego = samples.to_vec();
    let keep = width.keep_mask();

    stego
        .iter_mut()
        .zip(BitGroups::new(payload, width.get()))
        .for_each(|(sample, group)| {
            *sample = (*sample & keep) | group;
        });

    Ok(stego)
}

/// 从 `samples` 的低位中读回字节。
///
/// 没有长度信息，因此会解码整个缓冲区，真实载荷之后的内容是噪声；
/// 末尾不足 8 位的部分被丢弃。
///
/// # Errors
///
/// 位宽非法时返回 [`StegError::InvalidParameter`]。
pub fn extract(samples: &[u8], bit_width: u8) -> Result<Vec<u8>> {
    let width = BitWidth::new(bit_width)?;
    let mask = width.data_mask();

    Ok(regroup(
        samples.iter().map(|&sample| sample & mask),
        width.get(),
    ))
}
