//! 数据加载模块
//!
//! 提供 MAT -> JSON 转换、数据集加载、变换和批处理功能。
//!
//! # 主要组件
//!
//! - [`convert`]: MAT 文件转 JSON（`Ds` / `Ls` 两个键）
//! - [`FeatureDataset`]: 持有特征矩阵与标签向量的数据集
//! - [`DataLoader`]: `PyTorch` 风格的数据批量加载器
//! - [`transforms`]: 数据变换函数
//! - [`DataError`]: 数据加载错误类型
//!
//! # 使用示例
//!
//! ```ignore
//! use feature_gan::data::{DataLoader, FeatureDataset};
//!
//! let dataset = FeatureDataset::from_json_files(
//!     "Dataset/OfficeCaltech_1_SourceData.mat.json",
//!     "Dataset/OfficeCaltech_1_SourceLabel.mat.json",
//! )?;
//! let loader = DataLoader::new(dataset, 64)?.shuffle(true);
//! for (x_batch, y_batch) in loader.iter() {
//!     // ...
//! }
//! ```

pub mod convert;
mod dataloader;
pub mod datasets;
pub mod error;
pub mod transforms;

#[cfg(test)]
mod tests;

// Re-exports
pub use dataloader::{DataLoader, DataLoaderIterator};
pub use datasets::{DATA_KEY, FeatureDataset, LABEL_KEY};
pub use error::DataError;
