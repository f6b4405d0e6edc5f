//! 训练配置
//!
//! 命令行参数与默认值都沿用原始训练脚本（`--n-epochs 20 --batch-size 64 ...`）。

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tracing::debug;

use crate::data::transforms::scale_to_symmetric_unit;
use crate::data::{DataError, FeatureDataset};

/// 无条件 GAN 的默认采样间隔（批次数）
pub const GAN_SAMPLE_INTERVAL: usize = 400;
/// 条件 GAN 的默认采样间隔（批次数）
pub const CGAN_SAMPLE_INTERVAL: usize = 100;

/// 两种训练共用的参数
#[derive(Debug, Clone, Args, Serialize)]
pub struct GanConfig {
    /// number of epochs of training
    #[arg(long, default_value_t = 20)]
    pub n_epochs: usize,

    /// size of the batches
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// adam: learning rate
    #[arg(long, default_value_t = 0.0002)]
    pub lr: f32,

    /// adam: decay of first order momentum of gradient
    #[arg(long, default_value_t = 0.5)]
    pub b1: f32,

    /// adam: decay of second order momentum of gradient
    #[arg(long, default_value_t = 0.999)]
    pub b2: f32,

    /// dimensionality of the latent space
    #[arg(long, default_value_t = 100)]
    pub latent_dim: usize,

    /// number of features
    #[arg(long, default_value_t = 800)]
    pub features: usize,

    /// interval between image samples (default: 400 for gan, 100 for cgan)
    #[arg(long)]
    pub sample_interval: Option<usize>,

    /// data file (key `Ds`)
    #[arg(long, default_value = "Dataset/OfficeCaltech_1_SourceData.mat.json")]
    pub data: PathBuf,

    /// label file (key `Ls`)
    #[arg(long, default_value = "Dataset/OfficeCaltech_1_SourceLabel.mat.json")]
    pub labels: PathBuf,

    /// read `--data` / `--labels` as MAT files instead of JSON
    #[arg(long)]
    pub mat: bool,

    /// directory for sample images
    #[arg(long, default_value = "images")]
    pub images_dir: PathBuf,

    /// random seed for initialization, noise and shuffling
    #[arg(long)]
    pub seed: Option<u64>,

    /// scale every feature column into [-1, 1]
    #[arg(long)]
    pub scale: bool,

    /// labels start at 1 (MATLAB style)
    #[arg(long)]
    pub one_based_labels: bool,
}

impl Default for GanConfig {
    fn default() -> Self {
        Self {
            n_epochs: 20,
            batch_size: 64,
            lr: 0.0002,
            b1: 0.5,
            b2: 0.999,
            latent_dim: 100,
            features: 800,
            sample_interval: None,
            data: PathBuf::from("Dataset/OfficeCaltech_1_SourceData.mat.json"),
            labels: PathBuf::from("Dataset/OfficeCaltech_1_SourceLabel.mat.json"),
            mat: false,
            images_dir: PathBuf::from("images"),
            seed: None,
            scale: false,
            one_based_labels: false,
        }
    }
}

impl GanConfig {
    /// 按配置加载数据集，并依次应用标签平移与缩放
    pub fn load_dataset(&self) -> Result<FeatureDataset, DataError> {
        let mut dataset = if self.mat {
            FeatureDataset::from_mat_files(&self.data, &self.labels)?
        } else {
            FeatureDataset::from_json_files(&self.data, &self.labels)?
        };
        debug!(
            "已加载 {} 个样本，特征维数 {}",
            dataset.len(),
            dataset.feature_dim()
        );

        if self.one_based_labels {
            dataset.shift_labels(1)?;
        }
        if self.scale {
            scale_to_symmetric_unit(dataset.features_mut());
        }
        Ok(dataset)
    }
}

/// 条件 GAN 的参数：公共参数 + 类别数
#[derive(Debug, Clone, Args, Serialize)]
pub struct CganConfig {
    #[command(flatten)]
    #[serde(flatten)]
    pub base: GanConfig,

    /// number of classes for dataset
    #[arg(long, default_value_t = 10)]
    pub n_classes: usize,
}

impl Default for CganConfig {
    fn default() -> Self {
        Self {
            base: GanConfig::default(),
            n_classes: 10,
        }
    }
}
