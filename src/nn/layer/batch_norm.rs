/*
 * @Description  : BatchNorm1d 层
 *
 * 训练模式：用当前批次的均值与有偏方差归一化，并以`momentum`更新滑动均值/无偏方差；
 * 推理模式：用滑动统计量归一化。
 *
 * y = gamma * (x - mean) / sqrt(var + eps) + beta
 */

use ndarray::{Array1, Array2, Axis};

use super::{Layer, check_features, check_grad};
use crate::errors::{ComparisonOperator, NnError, Operator};
use crate::nn::Parameter;

#[derive(Debug, Clone)]
struct BatchNormCache {
    /// 归一化后的输入
    normalized: Array2<f32>,
    /// 1 / sqrt(var + eps)，形状 [features]
    inv_std: Array1<f32>,
    /// 前向时是否使用批统计量
    batch_stats: bool,
}

#[derive(Debug, Clone)]
pub struct BatchNorm1d {
    /// 缩放 [1, features]，初始为 1
    gamma: Parameter,
    /// 平移 [1, features]，初始为 0
    beta: Parameter,
    running_mean: Array1<f32>,
    running_var: Array1<f32>,
    eps: f32,
    momentum: f32,
    training: bool,
    cache: Option<BatchNormCache>,
}

impl BatchNorm1d {
    /// # 参数
    /// - `num_features`: 特征维度
    /// - `eps`: 加在方差上的数值稳定项（注意：GAN 生成器用的是 0.8）
    /// - `momentum`: 滑动统计量的更新系数
    pub fn new(num_features: usize, eps: f32, momentum: f32) -> Self {
        Self {
            gamma: Parameter::new(Array2::ones((1, num_features))),
            beta: Parameter::new(Array2::zeros((1, num_features))),
            running_mean: Array1::zeros(num_features),
            running_var: Array1::ones(num_features),
            eps,
            momentum,
            training: true,
            cache: None,
        }
    }

    pub fn num_features(&self) -> usize {
        self.running_mean.len()
    }

    pub fn eps(&self) -> f32 {
        self.eps
    }

    pub fn running_mean(&self) -> &Array1<f32> {
        &self.running_mean
    }

    pub fn running_var(&self) -> &Array1<f32> {
        &self.running_var
    }

    pub fn is_training(&self) -> bool {
        self.training
    }
}

impl Layer for BatchNorm1d {
    fn forward(&mut self, input: &Array2<f32>) -> Result<Array2<f32>, NnError> {
        check_features(input, self.num_features(), Operator::Normalize)?;
        let n = input.nrows();

        let (mean, var) = if self.training {
            // 单个样本无法估计方差
            if n < 2 {
                return Err(NnError::ValueMustSatisfyComparison {
                    value_name: "BatchNorm1d 训练模式下的批大小".to_string(),
                    operator: ComparisonOperator::GreaterOrEqual,
                    threshold: 2,
                    actual: n,
                });
            }
            let mean = input
                .mean_axis(Axis(0))
                .ok_or(NnError::EmptyBatch)?;
            let var = input.var_axis(Axis(0), 0.0);

            let unbiased = &var * (n as f32 / (n - 1) as f32);
            let m = self.momentum;
            self.running_mean = &self.running_mean * (1.0 - m) + &mean * m;
            self.running_var = &self.running_var * (1.0 - m) + unbiased * m;
            (mean, var)
        } else {
            (self.running_mean.clone(), self.running_var.clone())
        };

        let eps = self.eps;
        let inv_std = var.mapv(|v| 1.0 / (v + eps).sqrt());
        let normalized = (input - &mean) * &inv_std;
        let output = &normalized * &self.gamma.value + &self.beta.value;

        self.cache = Some(BatchNormCache {
            normalized,
            inv_std,
            batch_stats: self.training,
        });
        Ok(output)
    }

    fn backward(&mut self, grad_output: &Array2<f32>) -> Result<Array2<f32>, NnError> {
        let cache = self
            .cache
            .as_ref()
            .ok_or(NnError::BackwardBeforeForward("BatchNorm1d"))?;
        let x_hat = &cache.normalized;
        check_grad(grad_output, x_hat.shape())?;

        self.gamma.grad += &(grad_output * x_hat).sum_axis(Axis(0)).insert_axis(Axis(0));
        self.beta.grad += &grad_output.sum_axis(Axis(0)).insert_axis(Axis(0));

        let grad_x_hat = grad_output * &self.gamma.value;
        if !cache.batch_stats {
            // 滑动统计量是常数
            return Ok(grad_x_hat * &cache.inv_std);
        }

        // dx = inv_std / N * (N * dx̂ - Σdx̂ - x̂ * Σ(dx̂ * x̂))
        let n = x_hat.nrows() as f32;
        let sum_grad = grad_x_hat.sum_axis(Axis(0));
        let sum_grad_x_hat = (&grad_x_hat * x_hat).sum_axis(Axis(0));
        let grad_input = (&grad_x_hat * n - &sum_grad - x_hat * &sum_grad_x_hat) * &cache.inv_std / n;
        Ok(grad_input)
    }

    fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        vec![&mut self.gamma, &mut self.beta]
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
    }
}
