//! 神经网络层
//!
//! 所有层都实现 [`Layer`]，并通过 `enum_dispatch` 收拢到 [`LayerEnum`]，
//! 以便 [`Sequential`] 用一个 `Vec` 静态分发地保存各种层。
//! [`Embedding`] 的输入是类别标签而非矩阵，单独使用。

mod activation;
mod batch_norm;
mod dropout;
mod embedding;
mod linear;
mod sequential;

pub use activation::{LeakyRelu, Sigmoid, Tanh};
pub use batch_norm::BatchNorm1d;
pub use dropout::Dropout;
pub use embedding::Embedding;
pub use linear::Linear;
pub use sequential::Sequential;

use enum_dispatch::enum_dispatch;
use ndarray::{Array2, Axis, concatenate, s};

use super::Parameter;
use crate::errors::{ComparisonOperator, NnError, Operator};

#[enum_dispatch]
pub trait Layer {
    /// 前向传播，输入输出均为 [batch_size, features]；会缓存反向传播所需的中间量
    fn forward(&mut self, input: &Array2<f32>) -> Result<Array2<f32>, NnError>;

    /// 反向传播：接收对输出的梯度，累加参数梯度，返回对输入的梯度
    fn backward(&mut self, grad_output: &Array2<f32>) -> Result<Array2<f32>, NnError>;

    /// 本层的可训练参数（无参数层返回空）
    fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        Vec::new()
    }

    /// 切换训练/推理模式
    fn set_training(&mut self, _training: bool) {}
}

#[enum_dispatch(Layer)]
#[derive(Debug, Clone)]
pub enum LayerEnum {
    Linear,
    BatchNorm1d,
    LeakyRelu,
    Tanh,
    Sigmoid,
    Dropout,
}

/// 按列拼接两个批次相同的矩阵：[B, m] ++ [B, n] -> [B, m + n]
pub fn concat_columns(left: &Array2<f32>, right: &Array2<f32>) -> Result<Array2<f32>, NnError> {
    if left.nrows() != right.nrows() {
        return Err(NnError::ShapeMismatch {
            operator: Operator::Concat,
            left: left.shape().to_vec(),
            right: right.shape().to_vec(),
        });
    }
    let joined = concatenate(Axis(1), &[left.view(), right.view()]).map_err(|_| {
        NnError::ShapeMismatch {
            operator: Operator::Concat,
            left: left.shape().to_vec(),
            right: right.shape().to_vec(),
        }
    })?;
    Ok(joined.as_standard_layout().into_owned())
}

/// [`concat_columns`]的反向：把 [B, m + n] 的梯度拆回 [B, m] 与 [B, n]
pub fn split_columns(grad: &Array2<f32>, at: usize) -> Result<(Array2<f32>, Array2<f32>), NnError> {
    if at > grad.ncols() {
        return Err(NnError::ValueMustSatisfyComparison {
            value_name: "拆分位置".to_string(),
            operator: ComparisonOperator::LessOrEqual,
            threshold: grad.ncols(),
            actual: at,
        });
    }
    Ok((
        grad.slice(s![.., ..at]).to_owned(),
        grad.slice(s![.., at..]).to_owned(),
    ))
}

/// 检查输入列数与层的特征维度一致
pub(crate) fn check_features(
    input: &Array2<f32>,
    expected: usize,
    operator: Operator,
) -> Result<(), NnError> {
    if input.ncols() != expected {
        return Err(NnError::ShapeMismatch {
            operator,
            left: input.shape().to_vec(),
            right: vec![input.nrows(), expected],
        });
    }
    Ok(())
}

/// 检查反向传播的梯度与缓存的前向输出同形
pub(crate) fn check_grad(grad: &Array2<f32>, cached: &[usize]) -> Result<(), NnError> {
    if grad.shape() != cached {
        return Err(NnError::ShapeMismatch {
            operator: Operator::Backward,
            left: grad.shape().to_vec(),
            right: cached.to_vec(),
        });
    }
    Ok(())
}
