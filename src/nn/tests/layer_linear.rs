/*
 * @Description  : Linear layer 单元测试（Batch-First 设计）
 */

use approx::assert_abs_diff_eq;
use ndarray::array;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{check_layer_gradients, random_matrix};
use crate::errors::{NnError, Operator};
use crate::nn::{Layer, Linear};

/// 测试参数形状与初始化范围
#[test]
fn test_linear_shapes_and_init() {
    let mut rng = StdRng::seed_from_u64(42);
    let fc = Linear::new(16, 4, &mut rng);

    // 权重形状：[in_features, out_features]
    assert_eq!(fc.weights().shape(), &[16, 4]);
    // 偏置形状：[1, out_features]
    assert_eq!(fc.bias().shape(), &[1, 4]);

    let bound = 1.0 / 4.0; // 1 / sqrt(16)
    assert!(fc.weights().value.iter().all(|w| w.abs() <= bound));
    assert!(fc.bias().value.iter().all(|b| b.abs() <= bound));
}

/// 测试前向传播
#[test]
fn test_linear_forward() {
    let mut fc = Linear::from_parameters(array![[1.0, 2.0], [3.0, 4.0]], array![[0.5, -0.5]]);
    let x = array![[1.0, 1.0], [2.0, 0.0]];

    let y = fc.forward(&x).unwrap();
    // [1,1] @ W = [4, 6]；[2,0] @ W = [2, 4]
    assert_eq!(y, array![[4.5, 5.5], [2.5, 3.5]]);
}

/// 测试反向传播的梯度数值
#[test]
fn test_linear_backward() {
    let mut fc = Linear::from_parameters(array![[1.0, 2.0], [3.0, 4.0]], array![[0.0, 0.0]]);
    let x = array![[1.0, 1.0], [2.0, 0.0]];
    fc.forward(&x).unwrap();

    let grad_input = fc.backward(&array![[1.0, 0.0], [0.0, 1.0]]).unwrap();
    // dX = dY @ W^T
    assert_eq!(grad_input, array![[1.0, 3.0], [2.0, 4.0]]);
    // dW = X^T @ dY
    assert_eq!(fc.weights().grad, array![[1.0, 2.0], [1.0, 0.0]]);
    // db = Σ dY
    assert_eq!(fc.bias().grad, array![[1.0, 1.0]]);

    // 第二次反向传播：梯度累加
    fc.backward(&array![[1.0, 0.0], [0.0, 1.0]]).unwrap();
    assert_abs_diff_eq!(fc.bias().grad[[0, 1]], 2.0);
}

#[test]
fn test_linear_numeric_gradient() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut fc = Linear::new(5, 3, &mut rng);
    check_layer_gradients(&mut fc, &random_matrix(4, 5, 1), 2);
}

#[test]
fn test_linear_shape_errors() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut fc = Linear::new(3, 2, &mut rng);

    assert_eq!(
        fc.backward(&array![[1.0, 1.0]]),
        Err(NnError::BackwardBeforeForward("Linear"))
    );

    let err = fc.forward(&random_matrix(2, 4, 0)).unwrap_err();
    assert_eq!(
        err,
        NnError::ShapeMismatch {
            operator: Operator::MatMul,
            left: vec![2, 4],
            right: vec![2, 3],
        }
    );

    fc.forward(&random_matrix(2, 3, 0)).unwrap();
    assert!(matches!(
        fc.backward(&random_matrix(3, 2, 0)),
        Err(NnError::ShapeMismatch {
            operator: Operator::Backward,
            ..
        })
    ));
}
