//! 激活函数与 Dropout 单元测试

use approx::assert_abs_diff_eq;
use ndarray::{Array2, array};

use super::{check_layer_gradients, random_matrix};
use crate::errors::NnError;
use crate::nn::{Dropout, Layer, LeakyRelu, Sigmoid, Tanh};

#[test]
fn test_leaky_relu() {
    let mut act = LeakyRelu::new(0.2);
    let x = array![[-2.0, -0.5, 0.5, 3.0]];
    let y = act.forward(&x).unwrap();
    assert_eq!(y, array![[-0.4, -0.1, 0.5, 3.0]]);

    let grad = act.backward(&array![[1.0, 1.0, 1.0, 1.0]]).unwrap();
    assert_eq!(grad, array![[0.2, 0.2, 1.0, 1.0]]);
}

#[test]
fn test_tanh_and_sigmoid_values() {
    let mut tanh = Tanh::new();
    let mut sigmoid = Sigmoid::new();
    let x = array![[0.0, 1.0]];

    let t = tanh.forward(&x).unwrap();
    assert_abs_diff_eq!(t[[0, 0]], 0.0);
    assert_abs_diff_eq!(t[[0, 1]], 1.0f32.tanh(), epsilon = 1e-6);

    let s = sigmoid.forward(&x).unwrap();
    assert_abs_diff_eq!(s[[0, 0]], 0.5);
    // σ'(0) = 0.25
    let grad = sigmoid.backward(&array![[1.0, 0.0]]).unwrap();
    assert_abs_diff_eq!(grad[[0, 0]], 0.25, epsilon = 1e-6);

    assert_eq!(
        Tanh::new().backward(&x),
        Err(NnError::BackwardBeforeForward("Tanh"))
    );
}

#[test]
fn test_smooth_activations_numeric_gradient() {
    let x = random_matrix(3, 4, 5);
    check_layer_gradients(&mut Tanh::new(), &x, 6);
    check_layer_gradients(&mut Sigmoid::new(), &x, 7);
}

#[test]
fn test_dropout_training_mask() {
    let mut dropout = Dropout::new(0.5, 42);
    let x = Array2::ones((8, 16));
    let y = dropout.forward(&x).unwrap();

    // 保留的元素放大为 1 / (1 - p) = 2
    assert!(y.iter().all(|&v| v == 0.0 || v == 2.0));
    let kept = y.iter().filter(|&&v| v > 0.0).count();
    assert!(kept > 0 && kept < 128);

    // 反向使用相同的掩码
    let grad = dropout.backward(&Array2::ones((8, 16))).unwrap();
    assert_eq!(grad, y);
}

#[test]
fn test_dropout_eval_is_identity() {
    let mut dropout = Dropout::new(0.4, 0);
    dropout.set_training(false);
    let x = random_matrix(4, 4, 1);
    assert_eq!(dropout.forward(&x).unwrap(), x);
    assert_eq!(dropout.backward(&x).unwrap(), x);
}

#[test]
fn test_dropout_same_seed_same_mask() {
    let x = Array2::ones((4, 32));
    let a = Dropout::new(0.4, 9).forward(&x).unwrap();
    let b = Dropout::new(0.4, 9).forward(&x).unwrap();
    assert_eq!(a, b);
}
