//! 生成器 / 判别器结构测试

use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::errors::NnError;
use crate::gan::{CondDiscriminator, CondGenerator, Discriminator, Generator};
use crate::nn::Module;

fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

#[test]
fn test_generator_output_range_and_params() {
    let mut generator = Generator::new(8, 5, rng(0));
    let z = generator.sample_noise(4);
    assert_eq!(z.shape(), &[4, 8]);

    let samples = generator.forward(&z).unwrap();
    assert_eq!(samples.shape(), &[4, 5]);
    assert!(samples.iter().all(|&x| x > -1.0 && x < 1.0));

    // Linear 的 W、b 加上 BatchNorm 的 gamma、beta
    let expected = 8 * 128 + 128
        + 128 * 256 + 256 + 2 * 256
        + 256 * 512 + 512 + 2 * 512
        + 512 * 1024 + 1024 + 2 * 1024
        + 1024 * 5 + 5;
    assert_eq!(generator.num_params(), expected);
}

#[test]
fn test_discriminator_outputs_probabilities() {
    let mut discriminator = Discriminator::new(5, rng(1));
    let validity = discriminator.forward(&Array2::ones((3, 5))).unwrap();
    assert_eq!(validity.shape(), &[3, 1]);
    assert!(validity.iter().all(|&p| p > 0.0 && p < 1.0));

    let grad = discriminator.backward(&Array2::ones((3, 1))).unwrap();
    assert_eq!(grad.shape(), &[3, 5]);
}

#[test]
fn test_same_seed_same_model() {
    let mut a = Generator::new(4, 3, rng(7));
    let mut b = Generator::new(4, 3, rng(7));
    let za = a.sample_noise(2);
    let zb = b.sample_noise(2);
    assert_eq!(za, zb);
    assert_eq!(a.forward(&za).unwrap(), b.forward(&zb).unwrap());
}

#[test]
fn test_cond_generator_labels_and_embedding_grad() {
    let mut generator = CondGenerator::new(6, 3, 4, rng(2));
    let labels = generator.sample_labels(50);
    assert!(labels.iter().all(|&l| l < 3));

    let z = generator.sample_noise(4);
    let samples = generator.forward(&z, &[0, 1, 2, 0]).unwrap();
    assert_eq!(samples.shape(), &[4, 4]);

    generator.zero_grad();
    generator.backward(&Array2::ones((4, 4))).unwrap();
    // 第一个参数是嵌入表，被查过的行有梯度
    let params = generator.parameters_mut();
    assert_eq!(params[0].shape(), &[3, 3]);
    assert!(params[0].grad.iter().any(|&g| g != 0.0));

    assert_eq!(
        generator.forward(&generator_noise(), &[3]),
        Err(NnError::LabelOutOfRange {
            label: 3,
            num_embeddings: 3
        })
    );
}

fn generator_noise() -> Array2<f32> {
    Array2::zeros((1, 6))
}

#[test]
fn test_cond_discriminator_input_gradient() {
    let features = 3;
    let mut discriminator = CondDiscriminator::new(2, features, rng(3));
    // 关闭 Dropout，使前向确定
    discriminator.set_training(false);

    let x = Array2::from_shape_vec((2, features), vec![0.3, -0.2, 0.5, -0.7, 0.1, 0.9]).unwrap();
    let labels = [1, 0];
    discriminator.forward(&x, &labels).unwrap();
    let grad = discriminator.backward(&Array2::ones((2, 1))).unwrap();
    assert_eq!(grad.shape(), &[2, features]);

    let h = 1e-2;
    for ((i, j), &analytic) in grad.indexed_iter() {
        let mut plus = x.clone();
        plus[[i, j]] += h;
        let mut minus = x.clone();
        minus[[i, j]] -= h;
        let numeric = (discriminator.forward(&plus, &labels).unwrap().sum()
            - discriminator.forward(&minus, &labels).unwrap().sum())
            / (2.0 * h);
        assert!(
            (analytic - numeric).abs() <= 1e-2 * (1.0 + numeric.abs()),
            "解析梯度 {analytic} 与数值梯度 {numeric} 不一致"
        );
    }
}

#[test]
fn test_cond_discriminator_dropout_only_in_training() {
    let mut discriminator = CondDiscriminator::new(2, 3, rng(4));
    let x = Array2::ones((2, 3));

    discriminator.set_training(false);
    let a = discriminator.forward(&x, &[0, 1]).unwrap();
    let b = discriminator.forward(&x, &[0, 1]).unwrap();
    assert_eq!(a, b);

    discriminator.set_training(true);
    let c = discriminator.forward(&x, &[0, 1]).unwrap();
    let d = discriminator.forward(&x, &[0, 1]).unwrap();
    assert_ne!(c, d);
}
