//! # 载体图像模块
//!
//! 负责在图像文件与扁平的采样缓冲区之间转换。隐写核心只关心字节序列，
//! 宽、高与颜色类型由本模块保存，用于把修改后的缓冲区写回图像。

use crate::constants::LOSSLESS_FORMATS;
use anyhow::{Context, Result};
use colored::Colorize;
use image::{ColorType, DynamicImage, ImageFormat};
use log::debug;
use std::fs;
use std::path::Path;

/// 一张已解码的载体图像。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carrier {
    width: u32,
    height: u32,
    color: ColorType,
    samples: Vec<u8>,
}

impl Carrier {
    /// 打开并解码图像文件。
    ///
    /// 8 位的灰度、灰度+透明、RGB 与 RGBA 图像保持原样；
    /// 其余颜色类型统一转换为 RGBA8，保证每个采样恰好一个字节。
    ///
    /// # Errors
    ///
    /// 无法读取或解码图像文件时返回错误。
    pub fn open(path: &Path) -> Result<Self> {
        let image = image::open(path).with_context(|| {
            format!(
                "Unable to read image file: {}",
                path.to_string_lossy().red().bold()
            )
        })?;

        let image = match image {
            DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageRgb8(_)
            | DynamicImage::ImageRgba8(_) => image,
            other => {
                debug!("converting {:?} carrier to rgba8", other.color());
                DynamicImage::ImageRgba8(other.to_rgba8())
            }
        };

        let carrier = Self {
            width: image.width(),
            height: image.height(),
            color: image.color(),
            samples: image.into_bytes(),
        };
        debug!(
            "loaded carrier {}x{} {:?} with {} samples",
            carrier.width,
            carrier.height,
            carrier.color,
            carrier.samples.len()
        );

        Ok(carrier)
    }

    /// 由原始采样构造载体，缓冲区长度必须与形状一致。
    ///
    /// # Errors
    ///
    /// 长度不匹配时返回错误。
    pub fn from_raw(width: u32, height: u32, color: ColorType, samples: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * usize::from(color.bytes_per_pixel());
        anyhow::ensure!(
            samples.len() == expected,
            "Sample buffer length {} does not match a {}x{} {:?} image (expected {})",
            samples.len(),
            width,
            height,
            color,
            expected
        );

        Ok(Self {
            width,
            height,
            color,
            samples,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color(&self) -> ColorType {
        self.color
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// 用同样的形状包装一个新的采样缓冲区。
    ///
    /// # Errors
    ///
    /// 新缓冲区长度与原缓冲区不同时返回错误。
    pub fn with_samples(&self, samples: Vec<u8>) -> Result<Self> {
        Self::from_raw(self.width, self.height, self.color, samples)
    }

    /// 把载体扩展为目标格式能够原样读回的颜色类型。
    ///
    /// BMP 不会以灰度形式读回，L8 扩展为 Rgb8，LA8 扩展为 Rgba8；
    /// WebP 与 QOI 统一使用 Rgba8。灰度值复制到三个颜色通道，缺少的透明度补 255。
    /// 必须在嵌入之前调用，否则采样位置会错位。
    pub fn for_format(self, format: ImageFormat) -> Self {
        let target = match (format, self.color) {
            (ImageFormat::Bmp, ColorType::L8) => ColorType::Rgb8,
            (ImageFormat::Bmp, ColorType::La8) => ColorType::Rgba8,
            (ImageFormat::WebP | ImageFormat::Qoi, ColorType::L8 | ColorType::La8 | ColorType::Rgb8) => {
                ColorType::Rgba8
            }
            _ => return self,
        };
        debug!("expanding {:?} carrier to {:?} for {:?}", self.color, target, format);

        let channels = usize::from(self.color.channel_count());
        let out_channels = usize::from(target.channel_count());
        let samples = self
            .samples
            .chunks_exact(channels)
            .flat_map(|pixel| to_rgba(pixel).into_iter().take(out_channels))
            .collect();

        Self {
            color: target,
            samples,
            ..self
        }
    }

    /// 以无损格式写出图像，格式由扩展名决定。
    ///
    /// 写出后会重新读取文件，确认颜色类型与每个采样都没有变化；
    /// 不一致时删除写出的文件并返回错误。
    ///
    /// # Errors
    ///
    /// * 扩展名不是无损格式 (PNG, BMP, TIFF, WebP, QOI)。
    /// * 编码或写入文件失败。
    /// * 读回的图像与写出的采样不一致。
    pub fn save(&self, path: &Path) -> Result<()> {
        output_format(path)?;

        image::save_buffer(path, &self.samples, self.width, self.height, self.color)
            .with_context(|| {
                format!(
                    "Unable to write to target image file: {}",
                    path.to_string_lossy().red().bold()
                )
            })?;

        let written = Self::open(path)?;
        if written != *self {
            fs::remove_file(path).with_context(|| {
                format!(
                    "Unable to remove inexact image file: {}",
                    path.to_string_lossy().red().bold()
                )
            })?;
            anyhow::bail!(
                "The {:?} image written to {} reads back as {:?} with {} samples instead of {}. \nThe hidden data would not survive this format.",
                self.color,
                path.to_string_lossy().red().bold(),
                written.color,
                written.samples.len(),
                self.samples.len()
            );
        }
        debug!("wrote carrier to {}", path.display());

        Ok(())
    }
}

fn to_rgba(pixel: &[u8]) -> [u8; 4] {
    match *pixel {
        [l] => [l, l, l, 0xFF],
        [l, a] => [l, l, l, a],
        [r, g, b] => [r, g, b, 0xFF],
        [r, g, b, a, ..] => [r, g, b, a],
        [] => [0, 0, 0, 0xFF],
    }
}

/// 根据扩展名确定输出格式，只接受无损格式。
///
/// # Errors
///
/// 扩展名无法识别或不是无损格式时返回错误。
pub fn output_format(path: &Path) -> Result<ImageFormat> {
    ImageFormat::from_path(path)
        .ok()
        .filter(|format| LOSSLESS_FORMATS.contains(format))
        .with_context(|| {
            format!(
                "Output format of {} is not a supported lossless format (png, bmp, tiff, webp, qoi). \nLossy formats would destroy the hidden data.",
                path.to_string_lossy().red().bold()
            )
        })
}
