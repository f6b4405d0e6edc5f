//! Sequential 单元测试

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{check_layer_gradients, random_matrix};
use crate::nn::{BatchNorm1d, Layer, LayerEnum, Linear, Sequential, Sigmoid, Tanh};

fn small_net() -> Sequential {
    let mut rng = StdRng::seed_from_u64(3);
    Sequential::new()
        .add(Linear::new(4, 6, &mut rng))
        .add(BatchNorm1d::new(6, 0.8, 0.1))
        .add(Tanh::new())
        .add(Linear::new(6, 1, &mut rng))
        .add(Sigmoid::new())
}

#[test]
fn test_sequential_structure() {
    let mut net = small_net();
    assert_eq!(net.len(), 5);
    assert!(matches!(net.layers()[1], LayerEnum::BatchNorm1d(_)));
    // 两个 Linear 各 2 个参数，BatchNorm 2 个
    assert_eq!(net.parameters_mut().len(), 6);

    let y = net.forward(&random_matrix(5, 4, 0)).unwrap();
    assert_eq!(y.shape(), &[5, 1]);
    assert!(y.iter().all(|&p| p > 0.0 && p < 1.0));
}

#[test]
fn test_sequential_numeric_gradient() {
    check_layer_gradients(&mut small_net(), &random_matrix(5, 4, 30), 31);
}

#[test]
fn test_sequential_set_training() {
    let mut net = small_net();
    net.set_training(false);
    // 推理模式下 BatchNorm 接受单个样本
    assert!(net.forward(&random_matrix(1, 4, 0)).is_ok());
    net.set_training(true);
    assert!(net.forward(&random_matrix(1, 4, 0)).is_err());
}
