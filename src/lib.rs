//! # lsb_codec 库
//!
//! 本库包含多位 LSB 隐写工具的核心逻辑。
//!
//! 核心只有三个纯函数：[`capacity_bits`]、[`embed`] 和 [`extract`]，
//! 它们只处理扁平的字节采样序列，对图像的宽高与通道一无所知。
//! 载体必须以无损格式保存，否则隐藏的数据会被破坏。
//!
//! ```
//! use lsb_codec::{embed, extract};
//!
//! let cover = [255, 0, 240, 255, 0, 240, 255, 0];
//! let stego = embed(&cover, &[0x01], 1).unwrap();
//! assert_eq!(stego, [254, 0, 240, 254, 0, 240, 254, 1]);
//! assert_eq!(extract(&stego, 1).unwrap(), [0x01]);
//! ```

// 声明库包含的所有模块。

pub mod bits;
pub mod carrier;
pub mod cli;
pub mod constants;
pub mod error;
pub mod framing;
pub mod handler;
pub mod steganography;

pub use error::{Result, StegError};
pub use framing::{embed_framed, extract_framed, framed_capacity_bytes};
pub use steganography::{BitWidth, capacity_bits, embed, extract};
