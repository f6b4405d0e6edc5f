/*
 * @Description  : GAN / cGAN 的生成器与判别器
 *
 * 每个模型自己持有一个 StdRng：生成器用它采样噪声（及 cGAN 的随机标签），
 * 判别器用它派生 Dropout 的种子。
 */

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use tracing::debug;

use crate::errors::NnError;
use crate::nn::{
    BatchNorm1d, Dropout, Embedding, Layer, LeakyRelu, Linear, Module, Parameter, Sequential,
    Sigmoid, Tanh, concat_columns, split_columns,
};

/// 生成器中 BatchNorm1d 的 eps（原网络把 0.8 作为第二个位置参数传入，落在了 eps 上）
pub const GENERATOR_BN_EPS: f32 = 0.8;
pub const BN_MOMENTUM: f32 = 0.1;
pub const LEAKY_SLOPE: f32 = 0.2;
pub const DISCRIMINATOR_DROPOUT: f32 = 0.4;

/// Linear → [BatchNorm1d] → LeakyReLU
fn block(net: &mut Sequential, in_feat: usize, out_feat: usize, normalize: bool, rng: &mut StdRng) {
    net.push(Linear::new(in_feat, out_feat, rng));
    if normalize {
        net.push(BatchNorm1d::new(out_feat, GENERATOR_BN_EPS, BN_MOMENTUM));
    }
    net.push(LeakyRelu::new(LEAKY_SLOPE));
}

/// in → 128 → 256 → 512 → 1024 → features，输出经 Tanh 落在 (-1, 1)
fn generator_net(in_features: usize, features: usize, rng: &mut StdRng) -> Sequential {
    let mut net = Sequential::new();
    block(&mut net, in_features, 128, false, rng);
    block(&mut net, 128, 256, true, rng);
    block(&mut net, 256, 512, true, rng);
    block(&mut net, 512, 1024, true, rng);
    net.push(Linear::new(1024, features, rng));
    net.push(Tanh::new());
    net
}

/// 标准正态噪声 [n, dim]
fn normal_noise(rng: &mut StdRng, n: usize, dim: usize) -> Array2<f32> {
    Array2::from_shape_simple_fn((n, dim), || rng.sample(StandardNormal))
}

// ==================== 无条件 GAN ====================

pub struct Generator {
    net: Sequential,
    latent_dim: usize,
    rng: StdRng,
}

impl Generator {
    pub fn new(latent_dim: usize, features: usize, mut rng: StdRng) -> Self {
        let net = generator_net(latent_dim, features, &mut rng);
        debug!("Generator: {latent_dim} -> 128 -> 256 -> 512 -> 1024 -> {features}");
        Self {
            net,
            latent_dim,
            rng,
        }
    }

    pub fn latent_dim(&self) -> usize {
        self.latent_dim
    }

    /// 采样 [n, latent_dim] 的 N(0, 1) 噪声
    pub fn sample_noise(&mut self, n: usize) -> Array2<f32> {
        normal_noise(&mut self.rng, n, self.latent_dim)
    }

    pub fn forward(&mut self, z: &Array2<f32>) -> Result<Array2<f32>, NnError> {
        self.net.forward(z)
    }

    /// 反向传播到参数；返回对噪声的梯度
    pub fn backward(&mut self, grad_output: &Array2<f32>) -> Result<Array2<f32>, NnError> {
        self.net.backward(grad_output)
    }
}

impl Module for Generator {
    fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        self.net.parameters_mut()
    }

    fn set_training(&mut self, training: bool) {
        self.net.set_training(training);
    }
}

/// features → 512 → 256 → 1，输出为概率
pub struct Discriminator {
    net: Sequential,
}

impl Discriminator {
    pub fn new(features: usize, mut rng: StdRng) -> Self {
        let net = Sequential::new()
            .add(Linear::new(features, 512, &mut rng))
            .add(LeakyRelu::new(LEAKY_SLOPE))
            .add(Linear::new(512, 256, &mut rng))
            .add(LeakyRelu::new(LEAKY_SLOPE))
            .add(Linear::new(256, 1, &mut rng))
            .add(Sigmoid::new());
        debug!("Discriminator: {features} -> 512 -> 256 -> 1");
        Self { net }
    }

    pub fn forward(&mut self, samples: &Array2<f32>) -> Result<Array2<f32>, NnError> {
        self.net.forward(samples)
    }

    /// 返回对输入样本的梯度（训练生成器时继续传给生成器）
    pub fn backward(&mut self, grad_output: &Array2<f32>) -> Result<Array2<f32>, NnError> {
        self.net.backward(grad_output)
    }
}

impl Module for Discriminator {
    fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        self.net.parameters_mut()
    }

    fn set_training(&mut self, training: bool) {
        self.net.set_training(training);
    }
}

// ==================== 条件 GAN ====================

/// 输入为 [label_emb(labels), noise] 的生成器
pub struct CondGenerator {
    label_emb: Embedding,
    net: Sequential,
    latent_dim: usize,
    n_classes: usize,
    rng: StdRng,
}

impl CondGenerator {
    pub fn new(latent_dim: usize, n_classes: usize, features: usize, mut rng: StdRng) -> Self {
        let label_emb = Embedding::new(n_classes, n_classes, &mut rng);
        let net = generator_net(latent_dim + n_classes, features, &mut rng);
        debug!(
            "CondGenerator: {} + {} -> 128 -> 256 -> 512 -> 1024 -> {}",
            n_classes, latent_dim, features
        );
        Self {
            label_emb,
            net,
            latent_dim,
            n_classes,
            rng,
        }
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn sample_noise(&mut self, n: usize) -> Array2<f32> {
        normal_noise(&mut self.rng, n, self.latent_dim)
    }

    /// 均匀采样 n 个类别标签
    pub fn sample_labels(&mut self, n: usize) -> Vec<usize> {
        (0..n).map(|_| self.rng.gen_range(0..self.n_classes)).collect()
    }

    pub fn forward(&mut self, noise: &Array2<f32>, labels: &[usize]) -> Result<Array2<f32>, NnError> {
        let embedded = self.label_emb.forward(labels)?;
        let gen_input = concat_columns(&embedded, noise)?;
        self.net.forward(&gen_input)
    }

    /// 反向传播到网络与嵌入表
    pub fn backward(&mut self, grad_output: &Array2<f32>) -> Result<(), NnError> {
        let grad_input = self.net.backward(grad_output)?;
        let (grad_emb, _grad_noise) = split_columns(&grad_input, self.n_classes)?;
        self.label_emb.backward(&grad_emb)
    }
}

impl Module for CondGenerator {
    fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        let mut params = self.label_emb.parameters_mut();
        params.extend(self.net.parameters_mut());
        params
    }

    fn set_training(&mut self, training: bool) {
        self.net.set_training(training);
    }
}

/// 输入为 [samples, label_embedding(labels)] 的判别器，输出不经 Sigmoid（配合 MSE）
pub struct CondDiscriminator {
    label_embedding: Embedding,
    net: Sequential,
    features: usize,
}

impl CondDiscriminator {
    pub fn new(n_classes: usize, features: usize, mut rng: StdRng) -> Self {
        let label_embedding = Embedding::new(n_classes, n_classes, &mut rng);
        let net = Sequential::new()
            .add(Linear::new(features + n_classes, 512, &mut rng))
            .add(LeakyRelu::new(LEAKY_SLOPE))
            .add(Linear::new(512, 512, &mut rng))
            .add(Dropout::new(DISCRIMINATOR_DROPOUT, rng.r#gen()))
            .add(LeakyRelu::new(LEAKY_SLOPE))
            .add(Linear::new(512, 512, &mut rng))
            .add(Dropout::new(DISCRIMINATOR_DROPOUT, rng.r#gen()))
            .add(LeakyRelu::new(LEAKY_SLOPE))
            .add(Linear::new(512, 1, &mut rng));
        debug!(
            "CondDiscriminator: {} + {} -> 512 -> 512 -> 512 -> 1",
            features, n_classes
        );
        Self {
            label_embedding,
            net,
            features,
        }
    }

    pub fn forward(&mut self, samples: &Array2<f32>, labels: &[usize]) -> Result<Array2<f32>, NnError> {
        let embedded = self.label_embedding.forward(labels)?;
        let d_in = concat_columns(samples, &embedded)?;
        self.net.forward(&d_in)
    }

    /// 返回对输入样本的梯度
    pub fn backward(&mut self, grad_output: &Array2<f32>) -> Result<Array2<f32>, NnError> {
        let grad_input = self.net.backward(grad_output)?;
        let (grad_samples, grad_emb) = split_columns(&grad_input, self.features)?;
        self.label_embedding.backward(&grad_emb)?;
        Ok(grad_samples)
    }
}

impl Module for CondDiscriminator {
    fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        let mut params = self.label_embedding.parameters_mut();
        params.extend(self.net.parameters_mut());
        params
    }

    fn set_training(&mut self, training: bool) {
        self.net.set_training(training);
    }
}

/// 从主随机数生成器派生出独立的子生成器
pub(crate) fn child_rng(master: &mut StdRng) -> StdRng {
    StdRng::seed_from_u64(master.r#gen())
}
