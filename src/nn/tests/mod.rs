mod layer_activation;
mod layer_embedding;
mod layer_linear;
mod module_trait;
mod sequential;

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::nn::Layer;

/// 数值梯度的步长
const H: f32 = 1e-3;

/// [-1, 1] 内的确定性随机矩阵
fn random_matrix(rows: usize, cols: usize, seed: u64) -> Array2<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_simple_fn((rows, cols), || rng.gen_range(-1.0..1.0))
}

/// 以 `sum(layer(x) * weight)` 作为标量损失
fn weighted_sum<L: Layer>(layer: &mut L, x: &Array2<f32>, weight: &Array2<f32>) -> f32 {
    (layer.forward(x).unwrap() * weight).sum()
}

/// 中心差分估计对输入的梯度
fn numeric_input_grad<L: Layer>(layer: &mut L, x: &Array2<f32>, weight: &Array2<f32>) -> Array2<f32> {
    let mut grad = Array2::zeros(x.raw_dim());
    for idx in ndarray::indices(x.dim()) {
        let mut plus = x.clone();
        plus[idx] += H;
        let mut minus = x.clone();
        minus[idx] -= H;
        grad[idx] = (weighted_sum(layer, &plus, weight) - weighted_sum(layer, &minus, weight)) / (2.0 * H);
    }
    grad
}

/// 中心差分估计对第`index`个参数的梯度
fn numeric_param_grad<L: Layer>(
    layer: &mut L,
    index: usize,
    x: &Array2<f32>,
    weight: &Array2<f32>,
) -> Array2<f32> {
    let shape = layer.parameters_mut()[index].value.raw_dim();
    let mut grad = Array2::zeros(shape.clone());
    for idx in ndarray::indices(shape) {
        layer.parameters_mut()[index].value[idx] += H;
        let plus = weighted_sum(layer, x, weight);
        layer.parameters_mut()[index].value[idx] -= 2.0 * H;
        let minus = weighted_sum(layer, x, weight);
        layer.parameters_mut()[index].value[idx] += H;
        grad[idx] = (plus - minus) / (2.0 * H);
    }
    grad
}

/// 解析梯度与数值梯度逐元素比较
fn assert_grad_close(analytic: &Array2<f32>, numeric: &Array2<f32>) {
    assert_eq!(analytic.shape(), numeric.shape());
    for (a, n) in analytic.iter().zip(numeric) {
        assert!(
            (a - n).abs() <= 1e-2 * (1.0 + n.abs()),
            "解析梯度 {a} 与数值梯度 {n} 不一致"
        );
    }
}

/// 对一个层做完整的梯度检查：输入梯度与全部参数梯度
fn check_layer_gradients<L: Layer>(layer: &mut L, x: &Array2<f32>, seed: u64) {
    let output = layer.forward(x).unwrap();
    let weight = random_matrix(output.nrows(), output.ncols(), seed);

    for param in layer.parameters_mut() {
        param.zero_grad();
    }
    layer.forward(x).unwrap();
    let grad_input = layer.backward(&weight).unwrap();
    let param_grads: Vec<_> = layer
        .parameters_mut()
        .into_iter()
        .map(|p| p.grad.clone())
        .collect();

    assert_grad_close(&grad_input, &numeric_input_grad(layer, x, &weight));
    for (i, analytic) in param_grads.iter().enumerate() {
        assert_grad_close(analytic, &numeric_param_grad(layer, i, x, &weight));
    }
}
