/*
 * @Description  : Linear (全连接) 层
 *
 * `output = x @ W + b`，W 与 b 按 PyTorch 的默认方式初始化：U(-1/√in, 1/√in)
 */

use ndarray::{Array2, Axis};
use rand::Rng;
use rand_distr::Uniform;

use super::{Layer, check_features, check_grad};
use crate::errors::{NnError, Operator};
use crate::nn::Parameter;

/// Linear (全连接) 层
///
/// # 输入/输出形状
/// - 输入：[batch_size, in_features]
/// - 输出：[batch_size, out_features]
#[derive(Debug, Clone)]
pub struct Linear {
    /// 权重参数 [in_features, out_features]
    weights: Parameter,
    /// 偏置参数 [1, out_features]
    bias: Parameter,
    /// 前向输入缓存
    input: Option<Array2<f32>>,
}

impl Linear {
    /// 创建新的 Linear 层
    ///
    /// # 参数
    /// - `in_features`: 输入特征维度
    /// - `out_features`: 输出特征维度
    /// - `rng`: 初始化用的随机数生成器
    pub fn new<R: Rng + ?Sized>(in_features: usize, out_features: usize, rng: &mut R) -> Self {
        let bound = 1.0 / (in_features.max(1) as f32).sqrt();
        let dist = Uniform::new_inclusive(-bound, bound);
        let weights = Array2::from_shape_simple_fn((in_features, out_features), || rng.sample(dist));
        let bias = Array2::from_shape_simple_fn((1, out_features), || rng.sample(dist));
        Self::from_parameters(weights, bias)
    }

    /// 由给定的权重与偏置创建（主要用于测试）
    pub fn from_parameters(weights: Array2<f32>, bias: Array2<f32>) -> Self {
        Self {
            weights: Parameter::new(weights),
            bias: Parameter::new(bias),
            input: None,
        }
    }

    pub fn in_features(&self) -> usize {
        self.weights.value.nrows()
    }

    pub fn out_features(&self) -> usize {
        self.weights.value.ncols()
    }

    pub fn weights(&self) -> &Parameter {
        &self.weights
    }

    pub fn bias(&self) -> &Parameter {
        &self.bias
    }
}

impl Layer for Linear {
    fn forward(&mut self, input: &Array2<f32>) -> Result<Array2<f32>, NnError> {
        check_features(input, self.in_features(), Operator::MatMul)?;
        let output = input.dot(&self.weights.value) + &self.bias.value;
        self.input = Some(input.clone());
        Ok(output)
    }

    fn backward(&mut self, grad_output: &Array2<f32>) -> Result<Array2<f32>, NnError> {
        let input = self
            .input
            .as_ref()
            .ok_or(NnError::BackwardBeforeForward("Linear"))?;
        check_grad(grad_output, &[input.nrows(), self.out_features()])?;

        self.weights.grad += &input.t().dot(grad_output);
        self.bias.grad += &grad_output.sum_axis(Axis(0)).insert_axis(Axis(0));
        Ok(grad_output.dot(&self.weights.value.t()))
    }

    fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        vec![&mut self.weights, &mut self.bias]
    }
}
