mod models;

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::FeatureDataset;

/// n 个样本、features 维、标签循环取 0..n_classes 的合成数据集，特征在 [-1, 1]
fn synthetic_dataset(n: usize, features: usize, n_classes: usize, seed: u64) -> FeatureDataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = Array2::from_shape_simple_fn((n, features), || rng.gen_range(-1.0..1.0));
    let labels = Array1::from_iter((0..n).map(|i| i % n_classes));
    FeatureDataset::new(data, labels).unwrap()
}

fn temp_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("feature_gan_gan_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}
