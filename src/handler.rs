//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::carrier::{Carrier, output_format};
use crate::cli::{CapacityArgs, HideArgs, RecoverArgs};
use crate::constants::{
    DOCTORED_PREFIX, LENGTH_PREFIX_BYTES, MAX_BIT_WIDTH, RECOVERED_EXTENSION, RECOVERED_PREFIX,
};
use crate::framing::{embed_framed, extract_framed, framed_capacity_bytes};
use crate::steganography::{capacity_bits, embed, extract};
use anyhow::{Context, Result};
use colored::Colorize;
use log::{debug, info, warn};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和文本文件、检查隐写空间是否足够、调用隐写核心函数嵌入数据，
/// 最后将结果写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径与位宽的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像或文本文件。
/// * 目标文件已存在且未指定 `--force`。
/// * 图像文件没有足够的空间来隐藏文本。
/// * 目标路径不是无损格式，或无法写入。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = match args.dest {
        Some(dest) => dest,
        None => default_hide_dest(&args.image)?,
    };
    let format = output_format(&dest)?;
    ensure_writable(&dest, args.force)?;

    let carrier = Carrier::open(&args.image)?.for_format(format);

    let text = fs::read(&args.text).with_context(|| {
        format!(
            "Unable to read text file: {}",
            args.text.to_string_lossy().red().bold()
        )
    })?;

    let frame_bits = if args.raw { 0 } else { LENGTH_PREFIX_BYTES * 8 };
    let required_bits = text.len().saturating_mul(8).saturating_add(frame_bits);
    let available_bits = capacity_bits(carrier.sample_count(), args.bits)?;

    anyhow::ensure!(
        available_bits >= required_bits,
        "Not enough space in the image to hide the text. \nRequired: {} bits, Available: {} bits (at {} bit(s) per sample)",
        required_bits.to_string().red().bold(),
        available_bits.to_string().green().bold(),
        args.bits
    );
    info!(
        "embedding {} bytes into {} samples at {} bit(s) per sample",
        text.len(),
        carrier.sample_count(),
        args.bits
    );

    let samples = if args.raw {
        embed(carrier.samples(), &text, args.bits)
    } else {
        embed_framed(carrier.samples(), &text, args.bits)
    }
    .with_context(|| {
        format!(
            "Failed to hide the text in {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    carrier.with_samples(samples)?.save(&dest)?;

    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用恢复核心函数取回数据，
/// 最后将恢复的文本内容写入目标文本文件，或在指定 `--print` 时直接显示。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径与位宽的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像文件。
/// * 目标文件已存在且未指定 `--force`。
/// * 图像中没有有效的长度前缀 (非 `--raw` 模式)。
/// * 无法写入到目标文本文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    // 只要求打印时不写文件
    let text_path = match (args.text, args.print) {
        (Some(text), _) => Some(text),
        (None, false) => Some(default_recover_dest(&args.image)?),
        (None, true) => None,
    };
    if let Some(text_path) = &text_path {
        ensure_writable(text_path, args.force)?;
    }

    let carrier = Carrier::open(&args.image)?;

    let text = if args.raw {
        extract(carrier.samples(), args.bits)
    } else {
        extract_framed(carrier.samples(), args.bits)
    }
    .with_context(|| {
        format!(
            "Failed to recover the hidden text from '{}'. \nThe image may not contain a hidden message, or it was hidden with a different bit width.",
            args.image.to_string_lossy().red().bold()
        )
    })?;
    debug!("recovered {} bytes", text.len());

    if args.print {
        show_recovered(&text, &mut io::stdout().lock())?;
    }

    if let Some(text_path) = text_path {
        fs::write(&text_path, text).with_context(|| {
            format!(
                "Unable to write to target text file: {}",
                text_path.to_string_lossy().red().bold()
            )
        })?;

        println!(
            "The text has been successfully recovered and saved: {}",
            text_path.to_string_lossy().green().bold()
        );
    }
    Ok(())
}

/// 将恢复的字节按 UTF-8 (无效序列替换为 U+FFFD) 写到 `out`。
///
/// 内容为空或只有空白时改为输出提示，并返回 `false`。
///
/// # Errors
///
/// 写入 `out` 失败时返回错误。
pub fn show_recovered<W: Write>(text: &[u8], out: &mut W) -> Result<bool> {
    let text = String::from_utf8_lossy(text);

    if text.trim().is_empty() {
        warn!("recovered payload is empty or whitespace only");
        writeln!(out, "{}", "No valid hidden text found.".yellow().bold())
            .context("Unable to write the recovered text")?;
        return Ok(false);
    }

    writeln!(out, "{text}").context("Unable to write the recovered text")?;
    Ok(true)
}

/// 处理 'Capacity' 命令的执行逻辑。
///
/// 打印图像的采样数，以及每种位宽下的原始容量和扣除长度前缀后的可用字节数。
///
/// # Errors
///
/// 无法读取或解码输入图像时返回错误。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let carrier = Carrier::open(&args.image)?;
    let samples = carrier.sample_count();

    println!(
        "{}: {}x{} {:?}, {} samples",
        args.image.to_string_lossy().bold(),
        carrier.width(),
        carrier.height(),
        carrier.color(),
        samples.to_string().green().bold()
    );

    let widths = match args.bits {
        Some(bits) => bits..=bits,
        None => 1..=MAX_BIT_WIDTH,
    };
    for bits in widths {
        let raw_bits = capacity_bits(samples, bits)?;
        let framed = framed_capacity_bytes(samples, bits)?;
        println!(
            "  {} bit(s): {} bits ({} bytes) raw, {} bytes of text",
            bits,
            raw_bits,
            raw_bits / 8,
            framed.to_string().green().bold()
        );
    }

    Ok(())
}

/// 默认的隐写输出路径：输入图像同目录下的 `doctored_<文件名>`。
fn default_hide_dest(image: &Path) -> Result<PathBuf> {
    let name = image.file_name().with_context(|| {
        format!(
            "Unable to derive an output name from: {}",
            image.to_string_lossy().red().bold()
        )
    })?;

    Ok(image.with_file_name(format!(
        "{}{}",
        DOCTORED_PREFIX,
        name.to_string_lossy()
    )))
}

/// 默认的恢复输出路径：图像同目录下的 `recovered_<文件名主干>.txt`。
fn default_recover_dest(image: &Path) -> Result<PathBuf> {
    let stem = image.file_stem().with_context(|| {
        format!(
            "Unable to derive an output name from: {}",
            image.to_string_lossy().red().bold()
        )
    })?;

    Ok(image.with_file_name(format!(
        "{}{}.{}",
        RECOVERED_PREFIX,
        stem.to_string_lossy(),
        RECOVERED_EXTENSION
    )))
}

/// 覆盖保护：目标已存在且未指定 `--force` 时拒绝继续。
fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}
