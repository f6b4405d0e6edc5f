//! Embedding 单元测试

use ndarray::{Array2, array};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::errors::NnError;
use crate::nn::Embedding;

#[test]
fn test_embedding_lookup() {
    let mut emb = Embedding::from_weights(array![[0.0, 1.0], [2.0, 3.0], [4.0, 5.0]]);
    let out = emb.forward(&[2, 0, 2]).unwrap();
    assert_eq!(out, array![[4.0, 5.0], [0.0, 1.0], [4.0, 5.0]]);
}

#[test]
fn test_embedding_label_out_of_range() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut emb = Embedding::new(10, 10, &mut rng);
    assert_eq!(emb.weights().shape(), &[10, 10]);
    assert_eq!(
        emb.forward(&[3, 10]),
        Err(NnError::LabelOutOfRange {
            label: 10,
            num_embeddings: 10
        })
    );
}

#[test]
fn test_embedding_backward_scatter_add() {
    let mut emb = Embedding::from_weights(Array2::zeros((3, 2)));
    emb.forward(&[1, 1, 0]).unwrap();
    emb.backward(&array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();

    // 标签 1 出现两次，梯度累加
    assert_eq!(emb.weights().grad, array![[5.0, 6.0], [4.0, 6.0], [0.0, 0.0]]);
}
