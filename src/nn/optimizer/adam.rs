/*
 * @Description  : Adam优化器实现
 */

use ndarray::Array2;

use super::base::{Optimizer, OptimizerState};
use crate::errors::{NnError, Operator};
use crate::nn::Parameter;

/// Adam优化器
#[derive(Debug, Clone)]
pub struct Adam {
    state: OptimizerState,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    /// 一阶矩估计（按参数位置）
    m: Vec<Array2<f32>>,
    /// 二阶矩估计（按参数位置）
    v: Vec<Array2<f32>>,
}

impl Adam {
    /// 使用默认参数创建Adam优化器
    pub fn new(learning_rate: f32) -> Self {
        Self::new_with_config(learning_rate, 0.9, 0.999, 1e-8)
    }

    /// 使用指定参数创建Adam优化器
    ///
    /// # 示例
    /// ```ignore
    /// // GAN 训练：分别为 G 和 D 创建优化器
    /// let optimizer_g = Adam::new_with_config(0.0002, 0.5, 0.999, 1e-8);
    /// let optimizer_d = Adam::new_with_config(0.0002, 0.5, 0.999, 1e-8);
    /// ```
    pub fn new_with_config(learning_rate: f32, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Self {
            state: OptimizerState::new(learning_rate),
            beta1,
            beta2,
            epsilon,
            m: Vec::new(),
            v: Vec::new(),
        }
    }

    /// 已执行的更新次数
    pub fn steps(&self) -> usize {
        self.state.steps()
    }

    /// 首次 step 时按参数形状建立矩估计；之后参数列表须保持不变
    fn ensure_moments(&mut self, params: &[&mut Parameter]) -> Result<(), NnError> {
        if self.m.is_empty() {
            self.m = params.iter().map(|p| Array2::zeros(p.value.raw_dim())).collect();
            self.v = self.m.clone();
            return Ok(());
        }
        if self.m.len() != params.len() {
            return Err(NnError::ShapeMismatch {
                operator: Operator::Backward,
                left: vec![params.len()],
                right: vec![self.m.len()],
            });
        }
        for (m, p) in self.m.iter().zip(params) {
            if m.shape() != p.shape() {
                return Err(NnError::ShapeMismatch {
                    operator: Operator::Backward,
                    left: p.shape().to_vec(),
                    right: m.shape().to_vec(),
                });
            }
        }
        Ok(())
    }
}

impl Optimizer for Adam {
    fn step(&mut self, params: &mut [&mut Parameter]) -> Result<(), NnError> {
        self.ensure_moments(params)?;
        let t = self.state.tick() as i32;
        let lr = self.state.learning_rate();
        let (beta1, beta2, epsilon) = (self.beta1, self.beta2, self.epsilon);

        // 偏差修正系数
        let bias_correction1 = 1.0 - beta1.powi(t);
        let bias_correction2 = 1.0 - beta2.powi(t);

        for ((param, m), v) in params.iter_mut().zip(&mut self.m).zip(&mut self.v) {
            // m = β1 * m + (1 - β1) * g
            m.zip_mut_with(&param.grad, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
            // v = β2 * v + (1 - β2) * g²
            v.zip_mut_with(&param.grad, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);

            // θ = θ - α * m_hat / (√v_hat + ε)
            ndarray::Zip::from(&mut param.value)
                .and(&*m)
                .and(&*v)
                .for_each(|w, &m, &v| {
                    let m_hat = m / bias_correction1;
                    let v_hat = v / bias_correction2;
                    *w -= lr * m_hat / (v_hat.sqrt() + epsilon);
                });
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.m.clear();
        self.v.clear();
        self.state.reset();
    }

    fn learning_rate(&self) -> f32 {
        self.state.learning_rate()
    }

    fn set_learning_rate(&mut self, lr: f32) {
        self.state.set_learning_rate(lr);
    }
}
