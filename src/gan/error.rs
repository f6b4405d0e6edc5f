use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::data::DataError;
use crate::errors::NnError;
use crate::mat::MatError;

/// 训练过程中的错误
#[derive(Error, Debug)]
pub enum TrainError {
    #[error("数据错误: {0}")]
    Data(#[from] DataError),

    #[error("网络计算错误: {0}")]
    Nn(#[from] NnError),

    #[error("数据集特征维数为 {got}，但 --features 为 {expected}")]
    FeatureMismatch { expected: usize, got: usize },

    #[error("第 {index} 个样本的标签 {label} 超出类别数 {n_classes}")]
    LabelOutOfRange {
        index: usize,
        label: usize,
        n_classes: usize,
    },

    #[error("无效配置: {0}")]
    InvalidConfig(String),

    #[error("保存样本图像 {path:?} 失败: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("写出 npy 失败: {0}")]
    Npy(#[from] ndarray_npy::WriteNpyError),

    #[error("写出 MAT 失败: {0}")]
    Mat(#[from] MatError),

    #[error("形状错误: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("IO错误: {0}")]
    Io(#[from] io::Error),
}
