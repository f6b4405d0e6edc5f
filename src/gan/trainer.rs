/*
 * @Description  : GAN / cGAN 训练驱动
 *
 * 每个批次：先训练 G（g_loss = loss(D(G(z)), 1)，梯度穿过 D 传回 G），
 * 再训练 D（d_loss = (loss(D(real), 1) + loss(D(G(z).detach()), 0)) / 2），
 * 然后打印损失；`batches_done % sample_interval == 0` 时保存样本。
 */

use std::fs;
use std::path::{Path, PathBuf};

use ndarray::Array2;
use ndarray_npy::write_npy;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use super::config::{CGAN_SAMPLE_INTERVAL, CganConfig, GAN_SAMPLE_INTERVAL, GanConfig};
use super::error::TrainError;
use super::models::{CondDiscriminator, CondGenerator, Discriminator, Generator, child_rng};
use crate::data::{DataLoader, FeatureDataset};
use crate::mat::{MatArray, MatClass, MatData, MatVariable, MatWriter};
use crate::nn::{Adam, BceLoss, Module, MseLoss, Optimizer};
use crate::vision::Vision;

const ADAM_EPS: f32 = 1e-8;
/// 无条件训练结束时写出的样本堆叠文件名（不含扩展名）
pub const SAMPLE_STACK_NAME: &str = "gan_samples";

/// 一次训练的摘要
#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    pub epochs: usize,
    pub batches_per_epoch: usize,
    /// 最后一个批次的判别器损失（没有任何批次时为 None）
    pub d_loss: Option<f32>,
    pub g_loss: Option<f32>,
    /// 按写出顺序排列的样本文件
    pub sample_files: Vec<PathBuf>,
}

impl TrainReport {
    fn new(epochs: usize, batches_per_epoch: usize) -> Self {
        Self {
            epochs,
            batches_per_epoch,
            d_loss: None,
            g_loss: None,
            sample_files: Vec::new(),
        }
    }
}

/// 训练无条件 GAN（BCE 损失）
///
/// 每个采样点记录生成批次的第 0 行，并把整批渲染为 `<images_dir>/<batches_done>.png`；
/// 结束时把记录的行堆叠为 [num_samples, features]，写出 `gan_samples.npy` 与 `gan_samples.mat`（变量 `Ds`）。
pub fn train_gan(config: &GanConfig, dataset: FeatureDataset) -> Result<TrainReport, TrainError> {
    let sample_interval = config.sample_interval.unwrap_or(GAN_SAMPLE_INTERVAL);
    let (loader, mut master) = prepare(config, dataset, sample_interval)?;

    let mut generator = Generator::new(config.latent_dim, config.features, child_rng(&mut master));
    let mut discriminator = Discriminator::new(config.features, child_rng(&mut master));
    let adversarial_loss = BceLoss::new();
    let mut optimizer_g = Adam::new_with_config(config.lr, config.b1, config.b2, ADAM_EPS);
    let mut optimizer_d = Adam::new_with_config(config.lr, config.b1, config.b2, ADAM_EPS);

    let batches_per_epoch = loader.num_batches();
    let mut report = TrainReport::new(config.n_epochs, batches_per_epoch);
    let mut result: Vec<f32> = Vec::new();

    for epoch in 0..config.n_epochs {
        for (i, (real_samples, _)) in loader.iter_epoch(epoch).enumerate() {
            let batch_size = real_samples.nrows();
            let valid = Array2::ones((batch_size, 1));
            let fake = Array2::zeros((batch_size, 1));

            // -----------------
            //  Train Generator
            // -----------------
            generator.zero_grad();
            let z = generator.sample_noise(batch_size);
            let gen_samples = generator.forward(&z)?;
            let (g_loss, grad) = adversarial_loss.forward(&discriminator.forward(&gen_samples)?, &valid)?;
            let grad_gen = discriminator.backward(&grad)?;
            generator.backward(&grad_gen)?;
            optimizer_g.step(&mut generator.parameters_mut())?;

            // ---------------------
            //  Train Discriminator
            // ---------------------
            discriminator.zero_grad();
            let (real_loss, grad) = adversarial_loss.forward(&discriminator.forward(&real_samples)?, &valid)?;
            discriminator.backward(&(grad * 0.5))?;
            let (fake_loss, grad) = adversarial_loss.forward(&discriminator.forward(&gen_samples)?, &fake)?;
            discriminator.backward(&(grad * 0.5))?;
            let d_loss = (real_loss + fake_loss) / 2.0;
            optimizer_d.step(&mut discriminator.parameters_mut())?;

            log_batch(epoch, config.n_epochs, i, batches_per_epoch, d_loss, g_loss);
            report.d_loss = Some(d_loss);
            report.g_loss = Some(g_loss);

            let batches_done = epoch * batches_per_epoch + i;
            if batches_done % sample_interval == 0 {
                result.extend(gen_samples.row(0).iter());
                let path = save_sample(&config.images_dir, batches_done, &gen_samples)?;
                report.sample_files.push(path);
            }
        }
    }

    let stack = Array2::from_shape_vec((result.len() / config.features, config.features), result)?;
    report
        .sample_files
        .extend(save_sample_stack(&config.images_dir, &stack)?);
    Ok(report)
}

/// 训练条件 GAN（MSE 损失）
///
/// 每个采样点生成 n_classes × n_classes 个样本（第 r 行的标签依次为 0..n_classes），
/// 渲染为 `<images_dir>/<batches_done>.png`。
pub fn train_cgan(config: &CganConfig, dataset: FeatureDataset) -> Result<TrainReport, TrainError> {
    let base = &config.base;
    let n_classes = config.n_classes;
    if n_classes < 2 {
        return Err(TrainError::InvalidConfig(format!(
            "n_classes 至少为 2，实际为 {n_classes}"
        )));
    }
    if let Some((index, &label)) = dataset
        .labels()
        .iter()
        .enumerate()
        .find(|&(_, &label)| label >= n_classes)
    {
        return Err(TrainError::LabelOutOfRange {
            index,
            label,
            n_classes,
        });
    }

    let sample_interval = base.sample_interval.unwrap_or(CGAN_SAMPLE_INTERVAL);
    let (loader, mut master) = prepare(base, dataset, sample_interval)?;

    let mut generator = CondGenerator::new(
        base.latent_dim,
        n_classes,
        base.features,
        child_rng(&mut master),
    );
    let mut discriminator = CondDiscriminator::new(n_classes, base.features, child_rng(&mut master));
    let adversarial_loss = MseLoss::new();
    let mut optimizer_g = Adam::new_with_config(base.lr, base.b1, base.b2, ADAM_EPS);
    let mut optimizer_d = Adam::new_with_config(base.lr, base.b1, base.b2, ADAM_EPS);

    let batches_per_epoch = loader.num_batches();
    let mut report = TrainReport::new(base.n_epochs, batches_per_epoch);

    for epoch in 0..base.n_epochs {
        for (i, (real_samples, labels)) in loader.iter_epoch(epoch).enumerate() {
            let batch_size = real_samples.nrows();
            let valid = Array2::ones((batch_size, 1));
            let fake = Array2::zeros((batch_size, 1));

            // -----------------
            //  Train Generator
            // -----------------
            generator.zero_grad();
            let z = generator.sample_noise(batch_size);
            let gen_labels = generator.sample_labels(batch_size);
            let gen_samples = generator.forward(&z, &gen_labels)?;
            let validity = discriminator.forward(&gen_samples, &gen_labels)?;
            let (g_loss, grad) = adversarial_loss.forward(&validity, &valid)?;
            let grad_gen = discriminator.backward(&grad)?;
            generator.backward(&grad_gen)?;
            optimizer_g.step(&mut generator.parameters_mut())?;

            // ---------------------
            //  Train Discriminator
            // ---------------------
            discriminator.zero_grad();
            let validity_real = discriminator.forward(&real_samples, &labels)?;
            let (d_real_loss, grad) = adversarial_loss.forward(&validity_real, &valid)?;
            discriminator.backward(&(grad * 0.5))?;
            let validity_fake = discriminator.forward(&gen_samples, &gen_labels)?;
            let (d_fake_loss, grad) = adversarial_loss.forward(&validity_fake, &fake)?;
            discriminator.backward(&(grad * 0.5))?;
            let d_loss = (d_real_loss + d_fake_loss) / 2.0;
            optimizer_d.step(&mut discriminator.parameters_mut())?;

            log_batch(epoch, base.n_epochs, i, batches_per_epoch, d_loss, g_loss);
            report.d_loss = Some(d_loss);
            report.g_loss = Some(g_loss);

            let batches_done = epoch * batches_per_epoch + i;
            if batches_done % sample_interval == 0 {
                let grid = sample_grid(&mut generator, n_classes)?;
                let path = save_sample(&base.images_dir, batches_done, &grid)?;
                report.sample_files.push(path);
            }
        }
    }
    Ok(report)
}

/// 生成 n_row × n_row 个样本，第 r 行的标签为 0..n_row
fn sample_grid(generator: &mut CondGenerator, n_row: usize) -> Result<Array2<f32>, TrainError> {
    let z = generator.sample_noise(n_row * n_row);
    let labels: Vec<usize> = (0..n_row).flat_map(|_| 0..n_row).collect();
    Ok(generator.forward(&z, &labels)?)
}

/// 公共的准备工作：校验配置、建立 DataLoader 与主随机数生成器、创建输出目录
fn prepare(
    config: &GanConfig,
    dataset: FeatureDataset,
    sample_interval: usize,
) -> Result<(DataLoader, StdRng), TrainError> {
    if sample_interval == 0 {
        return Err(TrainError::InvalidConfig("sample_interval 必须大于 0".to_string()));
    }
    if config.features == 0 {
        return Err(TrainError::InvalidConfig("features 必须大于 0".to_string()));
    }
    if dataset.feature_dim() != config.features {
        return Err(TrainError::FeatureMismatch {
            expected: config.features,
            got: dataset.feature_dim(),
        });
    }

    let len = dataset.len();
    let mut loader = DataLoader::new(dataset, config.batch_size)?.shuffle(true);
    // 生成器中的 BatchNorm 无法处理只有 1 个样本的批次
    if len % config.batch_size == 1 {
        warn!(
            "{} 个样本按批大小 {} 划分后最后一个批次只有 1 个样本，已丢弃",
            len, config.batch_size
        );
        loader = loader.drop_last(true);
    }

    let master = match config.seed {
        Some(seed) => {
            loader = loader.seed(seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    fs::create_dir_all(&config.images_dir)?;
    Ok((loader, master))
}

fn log_batch(epoch: usize, n_epochs: usize, i: usize, n_batches: usize, d_loss: f32, g_loss: f32) {
    info!(
        "[Epoch {}/{}] [Batch {}/{}] [D loss: {:.6}] [G loss: {:.6}]",
        epoch, n_epochs, i, n_batches, d_loss, g_loss
    );
}

fn save_sample(dir: &Path, batches_done: usize, samples: &Array2<f32>) -> Result<PathBuf, TrainError> {
    let path = dir.join(format!("{batches_done}.png"));
    Vision::save_image(samples, &path).map_err(|source| TrainError::Image {
        path: path.clone(),
        source,
    })?;
    info!("已保存样本 {:?}", path);
    Ok(path)
}

/// 写出 `.npy` 与 `.mat`（变量 `Ds`）两份样本堆叠
fn save_sample_stack(dir: &Path, stack: &Array2<f32>) -> Result<Vec<PathBuf>, TrainError> {
    let npy_path = dir.join(format!("{SAMPLE_STACK_NAME}.npy"));
    write_npy(&npy_path, stack)?;

    let mat_path = dir.join(format!("{SAMPLE_STACK_NAME}.mat"));
    // MAT 按列优先存储
    let column_major = stack.t().iter().map(|&x| f64::from(x)).collect();
    let array = MatArray::new(MatClass::Double, stack.shape().to_vec(), MatData::Float(column_major))?;
    MatWriter::new().compress(true).save(
        &mat_path,
        &[MatVariable {
            name: crate::data::DATA_KEY.to_string(),
            array,
        }],
    )?;

    info!(
        "已写出 {} 个样本点：{:?}，{:?}",
        stack.nrows(),
        npy_path,
        mat_path
    );
    Ok(vec![npy_path, mat_path])
}
