/*
 * @Description  : Embedding 层
 *
 * 按类别标签查表：[B] 个标签 -> [B, embedding_dim]，权重按 N(0, 1) 初始化。
 * 反向时把梯度按行累加（scatter-add）到被查到的行上，同一标签出现多次则多次累加。
 */

use ndarray::{Array2, Axis};
use rand::Rng;
use rand_distr::StandardNormal;

use super::check_grad;
use crate::errors::NnError;
use crate::nn::Parameter;

#[derive(Debug, Clone)]
pub struct Embedding {
    /// [num_embeddings, embedding_dim]
    weights: Parameter,
    /// 前向时查过的标签
    labels: Option<Vec<usize>>,
}

impl Embedding {
    pub fn new<R: Rng + ?Sized>(num_embeddings: usize, embedding_dim: usize, rng: &mut R) -> Self {
        let weights = Array2::from_shape_simple_fn((num_embeddings, embedding_dim), || {
            rng.sample::<f32, _>(StandardNormal)
        });
        Self::from_weights(weights)
    }

    pub fn from_weights(weights: Array2<f32>) -> Self {
        Self {
            weights: Parameter::new(weights),
            labels: None,
        }
    }

    pub fn num_embeddings(&self) -> usize {
        self.weights.value.nrows()
    }

    pub fn embedding_dim(&self) -> usize {
        self.weights.value.ncols()
    }

    pub fn weights(&self) -> &Parameter {
        &self.weights
    }

    /// 查表
    ///
    /// # 错误
    /// 标签 ≥ `num_embeddings` 时返回 [`NnError::LabelOutOfRange`]
    pub fn forward(&mut self, labels: &[usize]) -> Result<Array2<f32>, NnError> {
        let num_embeddings = self.num_embeddings();
        if let Some(&label) = labels.iter().find(|&&l| l >= num_embeddings) {
            return Err(NnError::LabelOutOfRange {
                label,
                num_embeddings,
            });
        }
        let output = self.weights.value.select(Axis(0), labels);
        self.labels = Some(labels.to_vec());
        Ok(output)
    }

    /// 反向：只累加权重梯度，标签没有梯度
    pub fn backward(&mut self, grad_output: &Array2<f32>) -> Result<(), NnError> {
        let labels = self
            .labels
            .as_ref()
            .ok_or(NnError::BackwardBeforeForward("Embedding"))?;
        check_grad(grad_output, &[labels.len(), self.embedding_dim()])?;

        for (&label, grad_row) in labels.iter().zip(grad_output.rows()) {
            let mut row = self.weights.grad.row_mut(label);
            row += &grad_row;
        }
        Ok(())
    }

    pub fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        vec![&mut self.weights]
    }
}
