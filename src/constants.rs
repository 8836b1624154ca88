use image::ImageFormat;

/// 默认使用的最低有效位数量。
pub const DEFAULT_BIT_WIDTH: u8 = 1;

/// 允许的最大位宽。
/// 位宽为 8 时整个采样都会被覆盖，不再有任何“隐藏”可言。
pub const MAX_BIT_WIDTH: u8 = 7;

/// 用于记录载荷长度的前缀字节数。
/// 长度以 `u64` 大端序存储，占用 8 字节 (64 bits)。
pub const LENGTH_PREFIX_BYTES: usize = 8;

/// 未指定输出图像路径时，默认文件名的前缀。
pub const DOCTORED_PREFIX: &str = "doctored_";

/// 未指定输出文本路径时，默认文件名的前缀。
pub const RECOVERED_PREFIX: &str = "recovered_";

/// 恢复文本的默认扩展名。
pub const RECOVERED_EXTENSION: &str = "txt";

/// 可以安全写出的无损格式。任何有损重压缩都会破坏隐藏的数据。
pub const LOSSLESS_FORMATS: [ImageFormat; 5] = [
    ImageFormat::Png,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
    ImageFormat::WebP,
    ImageFormat::Qoi,
];
