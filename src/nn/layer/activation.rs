//! 逐元素激活函数：LeakyReLU、Tanh、Sigmoid
//!
//! 三者都没有参数，前向时缓存反向所需的量（输入或输出）。

use ndarray::Array2;

use super::{Layer, check_grad};
use crate::errors::NnError;

/// LeakyReLU：x > 0 时为 x，否则为 slope * x
#[derive(Debug, Clone)]
pub struct LeakyRelu {
    negative_slope: f32,
    input: Option<Array2<f32>>,
}

impl LeakyRelu {
    pub fn new(negative_slope: f32) -> Self {
        Self {
            negative_slope,
            input: None,
        }
    }

    pub fn negative_slope(&self) -> f32 {
        self.negative_slope
    }
}

impl Layer for LeakyRelu {
    fn forward(&mut self, input: &Array2<f32>) -> Result<Array2<f32>, NnError> {
        let slope = self.negative_slope;
        let output = input.mapv(|x| if x > 0.0 { x } else { slope * x });
        self.input = Some(input.clone());
        Ok(output)
    }

    fn backward(&mut self, grad_output: &Array2<f32>) -> Result<Array2<f32>, NnError> {
        let input = self
            .input
            .as_ref()
            .ok_or(NnError::BackwardBeforeForward("LeakyRelu"))?;
        check_grad(grad_output, input.shape())?;

        let slope = self.negative_slope;
        let mut grad = grad_output.clone();
        grad.zip_mut_with(input, |g, &x| {
            if x <= 0.0 {
                *g *= slope;
            }
        });
        Ok(grad)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tanh {
    output: Option<Array2<f32>>,
}

impl Tanh {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Layer for Tanh {
    fn forward(&mut self, input: &Array2<f32>) -> Result<Array2<f32>, NnError> {
        let output = input.mapv(f32::tanh);
        self.output = Some(output.clone());
        Ok(output)
    }

    fn backward(&mut self, grad_output: &Array2<f32>) -> Result<Array2<f32>, NnError> {
        let output = self
            .output
            .as_ref()
            .ok_or(NnError::BackwardBeforeForward("Tanh"))?;
        check_grad(grad_output, output.shape())?;
        // d tanh = 1 - y²
        Ok(grad_output * &output.mapv(|y| 1.0 - y * y))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sigmoid {
    output: Option<Array2<f32>>,
}

impl Sigmoid {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Layer for Sigmoid {
    fn forward(&mut self, input: &Array2<f32>) -> Result<Array2<f32>, NnError> {
        let output = input.mapv(|x| 1.0 / (1.0 + (-x).exp()));
        self.output = Some(output.clone());
        Ok(output)
    }

    fn backward(&mut self, grad_output: &Array2<f32>) -> Result<Array2<f32>, NnError> {
        let output = self
            .output
            .as_ref()
            .ok_or(NnError::BackwardBeforeForward("Sigmoid"))?;
        check_grad(grad_output, output.shape())?;
        Ok(grad_output * &output.mapv(|y| y * (1.0 - y)))
    }
}
