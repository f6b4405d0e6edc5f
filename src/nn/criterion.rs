/*
 * @Description  : 损失函数
 *
 * 每个损失的`forward`返回 (标量损失, 对输入的梯度)，梯度直接交给模型的`backward`：
 *
 * ```ignore
 * let criterion = BceLoss::new();
 * let validity = discriminator.forward(&x)?;
 * let (loss, grad) = criterion.forward(&validity, &valid)?;
 * discriminator.backward(&grad)?;
 * ```
 */

use ndarray::Array2;

use crate::errors::{NnError, Operator};

fn check_same_shape(input: &Array2<f32>, target: &Array2<f32>) -> Result<f32, NnError> {
    if input.shape() != target.shape() {
        return Err(NnError::ShapeMismatch {
            operator: Operator::Loss,
            left: input.shape().to_vec(),
            right: target.shape().to_vec(),
        });
    }
    if input.is_empty() {
        return Err(NnError::EmptyBatch);
    }
    Ok(input.len() as f32)
}

/// 二元交叉熵（输入为概率），对所有元素取平均
///
/// 与 PyTorch 一致：log 项下限为 -100，梯度分母下限为 1e-12，
/// 因此输入为 0 或 1 时损失与梯度都是有限值。
#[derive(Debug, Clone, Copy, Default)]
pub struct BceLoss;

impl BceLoss {
    const LOG_MIN: f32 = -100.0;
    const EPSILON: f32 = 1e-12;

    pub fn new() -> Self {
        Self
    }

    pub fn forward(
        &self,
        input: &Array2<f32>,
        target: &Array2<f32>,
    ) -> Result<(f32, Array2<f32>), NnError> {
        let n = check_same_shape(input, target)?;

        let mut loss = 0.0;
        let mut grad = Array2::zeros(input.raw_dim());
        ndarray::Zip::from(&mut grad)
            .and(input)
            .and(target)
            .for_each(|g, &p, &t| {
                let log_p = p.ln().max(Self::LOG_MIN);
                let log_1mp = (1.0 - p).ln().max(Self::LOG_MIN);
                loss -= t * log_p + (1.0 - t) * log_1mp;
                *g = (p - t) / ((1.0 - p) * p).max(Self::EPSILON) / n;
            });
        Ok((loss / n, grad))
    }
}

/// 均方误差，对所有元素取平均
#[derive(Debug, Clone, Copy, Default)]
pub struct MseLoss;

impl MseLoss {
    pub fn new() -> Self {
        Self
    }

    pub fn forward(
        &self,
        input: &Array2<f32>,
        target: &Array2<f32>,
    ) -> Result<(f32, Array2<f32>), NnError> {
        let n = check_same_shape(input, target)?;
        let diff = input - target;
        let loss = diff.mapv(|d| d * d).sum() / n;
        Ok((loss, diff * (2.0 / n)))
    }
}
