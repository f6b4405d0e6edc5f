//! Module trait 测试

use ndarray::array;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::nn::{BatchNorm1d, Layer, Linear, Module, Parameter, Sequential};

struct Mlp {
    net: Sequential,
}

impl Mlp {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(0);
        Self {
            net: Sequential::new()
                .add(Linear::new(3, 4, &mut rng))
                .add(BatchNorm1d::new(4, 1e-5, 0.1))
                .add(Linear::new(4, 2, &mut rng)),
        }
    }
}

impl Module for Mlp {
    fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        self.net.parameters_mut()
    }

    fn set_training(&mut self, training: bool) {
        self.net.set_training(training);
    }
}

#[test]
fn test_num_params() {
    let mut mlp = Mlp::new();
    // 3*4 + 4 + 4 + 4 + 4*2 + 2
    assert_eq!(mlp.num_params(), 34);
}

#[test]
fn test_zero_grad() {
    let mut mlp = Mlp::new();
    let x = array![[1.0, 2.0, 3.0], [0.0, -1.0, 1.0]];
    let y = mlp.net.forward(&x).unwrap();
    mlp.net.backward(&y).unwrap();
    assert!(mlp.parameters_mut().iter().any(|p| p.grad.iter().any(|&g| g != 0.0)));

    mlp.zero_grad();
    assert!(mlp.parameters_mut().iter().all(|p| p.grad.iter().all(|&g| g == 0.0)));
}
