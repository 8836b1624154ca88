//! # 长度帧模块
//!
//! 原始的嵌入方式不记录载荷长度，提取时只能解码整个缓冲区。
//! 本模块在载荷之前写入一个 `u64` 大端序长度前缀，使提取结果恰好等于原始载荷。

use crate::constants::LENGTH_PREFIX_BYTES;
use crate::error::{Result, StegError};
use crate::steganography::{capacity_bits, embed, extract};

/// 在给定位宽下，扣除长度前缀后还能容纳的载荷字节数。
pub fn framed_capacity_bytes(sample_count: usize, bit_width: u8) -> Result<usize> {
    let bytes = capacity_bits(sample_count, bit_width)? / 8;
    Ok(bytes.saturating_sub(LENGTH_PREFIX_BYTES))
}

/// 先嵌入长度前缀，再嵌入载荷。
///
/// # Errors
///
/// 与 [`embed`] 相同；`PayloadTooLarge` 中的位数包含了前缀。
pub fn embed_framed(samples: &[u8], payload: &[u8], bit_width: u8) -> Result<Vec<u8>> {
    let mut frame = Vec::with_capacity(LENGTH_PREFIX_BYTES + payload.len());
    frame.extend_from_slice(&(payload.len() as u64).to_be_bytes());
    frame.extend_from_slice(payload);

    embed(samples, &frame, bit_width)
}

/// 读取长度前缀，并返回恰好该长度的载荷。
///
/// # Errors
///
/// * 位宽非法时返回 [`StegError::InvalidParameter`]。
/// * 缓冲区放不下前缀，或前缀声明的长度超出可解码的字节数时，
///   返回 [`StegError::InvalidLength`]。未嵌入过数据的图像通常会落入这种情况。
pub fn extract_framed(samples: &[u8], bit_width: u8) -> Result<Vec<u8>> {
    let mut decoded = extract(samples, bit_width)?;

    let Some((prefix, body)) = decoded.split_first_chunk::<LENGTH_PREFIX_BYTES>() else {
        return Err(StegError::InvalidLength {
            declared: 0,
            available: decoded.len(),
        });
    };

    let declared = u64::from_be_bytes(*prefix);
    let available = body.len();
    let len = usize::try_from(declared)
        .ok()
        .filter(|&len| len <= available)
        .ok_or(StegError::InvalidLength {
            declared,
            available,
        })?;

    decoded.truncate(LENGTH_PREFIX_BYTES + len);
    decoded.drain(..LENGTH_PREFIX_BYTES);
    Ok(decoded)
}
