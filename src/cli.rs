//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use crate::constants::{DEFAULT_BIT_WIDTH, MAX_BIT_WIDTH};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// 一款基于多位 LSB (最低有效位) 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 中隐藏或恢复文本。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于多位 LSB (最低有效位) 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 中隐藏或恢复文本。\n每个采样使用的低位数量可在 1 到 7 之间选择。"
)]
pub struct Cli {
    /// 输出更详细的日志 (可重复，如 -vv)。
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏)、recover (恢复) 和 capacity (容量)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在无损格式图像 (如 PNG, BMP) 中隐藏文本文件内容。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的文本。
    Recover(RecoverArgs),

    /// 显示图像在不同位宽下能够隐藏的数据量。
    Capacity(CapacityArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文本内容的文件路径。
    #[arg(short, long)]
    pub text: PathBuf,

    /// 隐写完成后，保存结果图像的输出路径。
    /// 默认为输入图像同目录下的 `doctored_<文件名>`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 每个采样使用的最低有效位数量 (1-7)。
    #[arg(short, long, default_value_t = DEFAULT_BIT_WIDTH, value_parser = clap::value_parser!(u8).range(1..=MAX_BIT_WIDTH as i64))]
    pub bits: u8,

    /// 不写入长度前缀，只嵌入原始文本位。
    #[arg(long)]
    pub raw: bool,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏文本数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复文本后，保存文本内容的输出路径。
    /// 默认为图像同目录下的 `recovered_<文件名>.txt`。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 隐藏时使用的最低有效位数量 (1-7)。
    #[arg(short, long, default_value_t = DEFAULT_BIT_WIDTH, value_parser = clap::value_parser!(u8).range(1..=MAX_BIT_WIDTH as i64))]
    pub bits: u8,

    /// 不读取长度前缀，输出整个缓冲区解码出的字节。
    #[arg(long)]
    pub raw: bool,

    /// 在终端显示恢复的文本；未同时指定 `--text` 时不写文件。
    #[arg(short, long)]
    pub print: bool,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 要检查的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 只显示指定位宽 (1-7)；省略时列出全部位宽。
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=MAX_BIT_WIDTH as i64))]
    pub bits: Option<u8>,
}
