use ndarray::Array2;

use super::{Layer, LayerEnum};
use crate::errors::NnError;
use crate::nn::Parameter;

/// 顺序容器：前向按添加顺序，反向按相反顺序
///
/// # 示例
/// ```ignore
/// let mut net = Sequential::new()
///     .add(Linear::new(800, 512, &mut rng))
///     .add(LeakyRelu::new(0.2));
/// let y = net.forward(&x)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Sequential {
    layers: Vec<LayerEnum>,
}

impl Sequential {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一层
    pub fn add<L: Into<LayerEnum>>(mut self, layer: L) -> Self {
        self.layers.push(layer.into());
        self
    }

    pub fn push<L: Into<LayerEnum>>(&mut self, layer: L) {
        self.layers.push(layer.into());
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> &[LayerEnum] {
        &self.layers
    }
}

impl Layer for Sequential {
    fn forward(&mut self, input: &Array2<f32>) -> Result<Array2<f32>, NnError> {
        let mut x = input.clone();
        for layer in &mut self.layers {
            x = layer.forward(&x)?;
        }
        Ok(x)
    }

    fn backward(&mut self, grad_output: &Array2<f32>) -> Result<Array2<f32>, NnError> {
        let mut grad = grad_output.clone();
        for layer in self.layers.iter_mut().rev() {
            grad = layer.backward(&grad)?;
        }
        Ok(grad)
    }

    fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        self.layers
            .iter_mut()
            .flat_map(|layer| layer.parameters_mut())
            .collect()
    }

    fn set_training(&mut self, training: bool) {
        for layer in &mut self.layers {
            layer.set_training(training);
        }
    }
}
