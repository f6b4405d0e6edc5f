//! # Feature GAN
//!
//! `feature_gan`用纯rust在表格特征数据上训练[GAN](https://arxiv.org/abs/1406.2661)
//! 与[条件GAN](https://arxiv.org/abs/1411.1784)，数据来自 MATLAB 的 MAT 文件
//! （或由其转换得到的 JSON 文件）。
//!
//! - [`mat`]: MAT level-5 文件的读写
//! - [`data`]: MAT -> JSON 转换、数据集与批量加载
//! - [`nn`]: 手写前向/反向传播的小型全连接网络框架
//! - [`gan`]: 生成器、判别器与训练驱动
//! - [`vision`]: 把生成样本保存为灰度图
//!

pub mod data;
pub mod errors;
pub mod gan;
pub mod mat;
pub mod nn;
pub mod vision;
