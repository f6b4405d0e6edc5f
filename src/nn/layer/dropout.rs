use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Layer, check_grad};
use crate::errors::NnError;

/// Dropout（inverted）：训练时以概率`p`置零，保留的元素乘以 1/(1-p)；推理时恒等
#[derive(Debug, Clone)]
pub struct Dropout {
    p: f32,
    training: bool,
    rng: StdRng,
    /// 训练模式下的缩放掩码；推理模式下为 None
    mask: Option<Array2<f32>>,
    /// 前向输出的形状，推理模式反向时检查用
    shape: Option<Vec<usize>>,
}

impl Dropout {
    pub fn new(p: f32, seed: u64) -> Self {
        Self {
            p: p.clamp(0.0, 1.0),
            training: true,
            rng: StdRng::seed_from_u64(seed),
            mask: None,
            shape: None,
        }
    }

    pub fn p(&self) -> f32 {
        self.p
    }
}

impl Layer for Dropout {
    fn forward(&mut self, input: &Array2<f32>) -> Result<Array2<f32>, NnError> {
        self.shape = Some(input.shape().to_vec());
        if !self.training || self.p == 0.0 {
            self.mask = None;
            return Ok(input.clone());
        }

        let keep = 1.0 - self.p;
        let scale = if keep > 0.0 { 1.0 / keep } else { 0.0 };
        let rng = &mut self.rng;
        let mask = Array2::from_shape_simple_fn(input.raw_dim(), || {
            if rng.r#gen::<f32>() < keep { scale } else { 0.0 }
        });
        let output = input * &mask;
        self.mask = Some(mask);
        Ok(output)
    }

    fn backward(&mut self, grad_output: &Array2<f32>) -> Result<Array2<f32>, NnError> {
        let shape = self
            .shape
            .as_ref()
            .ok_or(NnError::BackwardBeforeForward("Dropout"))?;
        check_grad(grad_output, shape)?;
        match &self.mask {
            Some(mask) => Ok(grad_output * mask),
            None => Ok(grad_output.clone()),
        }
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
    }
}
