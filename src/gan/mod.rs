//! # GAN 训练
//!
//! - [`train_gan`]: 无条件 GAN，判别器输出概率，BCE 损失
//! - [`train_cgan`]: 条件 GAN，生成器与判别器都以类别标签的嵌入为条件，MSE 损失
//!
//! ```ignore
//! let config = GanConfig::default();
//! let dataset = config.load_dataset()?;
//! let report = train_gan(&config, dataset)?;
//! ```

mod config;
mod error;
mod models;
mod trainer;

#[cfg(test)]
mod tests;

pub use config::{CGAN_SAMPLE_INTERVAL, CganConfig, GAN_SAMPLE_INTERVAL, GanConfig};
pub use error::TrainError;
pub use models::{CondDiscriminator, CondGenerator, Discriminator, Generator};
pub use trainer::{SAMPLE_STACK_NAME, TrainReport, train_cgan, train_gan};
