//! feature_gan 命令行入口
//!
//! - `convert`: MAT 文件转 JSON
//! - `gan`: 训练无条件 GAN
//! - `cgan`: 训练条件 GAN

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use feature_gan::data::convert::{DEFAULT_KEYS, mat_to_json};
use feature_gan::gan::{CganConfig, GanConfig, TrainReport, train_cgan, train_gan};

/// Train GANs on tabular feature data stored in MAT / JSON files
#[derive(Parser)]
#[command(name = "feature_gan")]
#[command(version)]
#[command(about = "Train a GAN or conditional GAN on MATLAB feature data")]
struct Cli {
    /// Verbosity level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert MAT files to `<file>.json`
    Convert {
        /// MAT files to convert
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Variables to keep (default: Ds and Ls)
        #[arg(short, long = "key")]
        keys: Vec<String>,
    },

    /// Train the unconditional GAN
    Gan(GanConfig),

    /// Train the conditional GAN
    Cgan(CganConfig),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = match cli.verbosity.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Convert { files, keys } => {
            let keys: Vec<&str> = if keys.is_empty() {
                DEFAULT_KEYS.to_vec()
            } else {
                keys.iter().map(String::as_str).collect()
            };
            for file in &files {
                mat_to_json(file, &keys).with_context(|| format!("转换 {:?} 失败", file))?;
            }
        }
        Commands::Gan(config) => {
            info!("{}", serde_json::to_string(&config)?);
            let dataset = config.load_dataset().context("加载数据集失败")?;
            let report = train_gan(&config, dataset)?;
            summarize(&report);
        }
        Commands::Cgan(config) => {
            info!("{}", serde_json::to_string(&config)?);
            let dataset = config.base.load_dataset().context("加载数据集失败")?;
            let report = train_cgan(&config, dataset)?;
            summarize(&report);
        }
    }

    Ok(())
}

fn summarize(report: &TrainReport) {
    info!(
        "训练完成：{} 轮 × {} 批，最终 D loss: {:?}，G loss: {:?}，共写出 {} 个样本文件",
        report.epochs,
        report.batches_per_epoch,
        report.d_loss,
        report.g_loss,
        report.sample_files.len()
    );
}
