//! # 神经网络模块
//!
//! 基于 `ndarray` 的小型全连接网络框架：每层缓存前向所需的中间量，
//! 由手写的 `backward` 把梯度逐层传回，并累加到各层的 [`Parameter::grad`] 上。
//!
//! 约定：所有张量都是 batch-first 的二维矩阵 `[batch_size, features]`。

mod criterion;
mod layer;
mod module;
mod optimizer;
mod parameter;

#[cfg(test)]
mod tests;

pub use criterion::{BceLoss, MseLoss};
pub use layer::{
    BatchNorm1d, Dropout, Embedding, Layer, LayerEnum, LeakyRelu, Linear, Sequential, Sigmoid,
    Tanh, concat_columns, split_columns,
};
pub use module::Module;
pub use optimizer::{Adam, Optimizer};
pub use parameter::Parameter;
