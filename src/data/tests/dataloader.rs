//! DataLoader 单元测试

use ndarray::{Array1, Array2};

use crate::data::{DataError, DataLoader, FeatureDataset};

fn dataset(n: usize) -> FeatureDataset {
    let features = Array2::from_shape_vec((n, 2), (0..2 * n).map(|x| x as f32).collect()).unwrap();
    let labels = Array1::from_vec((0..n).collect());
    FeatureDataset::new(features, labels).unwrap()
}

#[test]
fn test_dataloader_basic() {
    let loader = DataLoader::new(dataset(10), 3).unwrap();
    assert_eq!(loader.num_batches(), 4); // 10 / 3 = 3.33, 向上取整 = 4

    let batches: Vec<_> = loader.iter().collect();
    assert_eq!(batches.len(), 4);

    // 前 3 个批次大小为 3
    assert_eq!(batches[0].0.nrows(), 3);
    assert_eq!(batches[1].0.nrows(), 3);
    assert_eq!(batches[2].0.nrows(), 3);
    // 最后一个批次大小为 1
    assert_eq!(batches[3].0.nrows(), 1);
    assert_eq!(batches[3].1, vec![9]);
}

#[test]
fn test_dataloader_keeps_pairs_aligned() {
    let loader = DataLoader::new(dataset(7), 2).unwrap().shuffle(true).seed(3);
    for (features, labels) in loader.iter() {
        for (row, label) in features.rows().into_iter().zip(labels) {
            // 第 i 个样本的特征为 [2i, 2i+1]
            assert_eq!(row[0], (2 * label) as f32);
            assert_eq!(row[1], (2 * label + 1) as f32);
        }
    }
}

#[test]
fn test_dataloader_drop_last() {
    let loader = DataLoader::new(dataset(10), 3).unwrap().drop_last(true);
    assert_eq!(loader.num_batches(), 3); // 10 / 3 = 3

    let batches: Vec<_> = loader.iter().collect();
    assert_eq!(batches.len(), 3);
}

#[test]
fn test_dataloader_shuffle_with_seed() {
    // 使用相同种子，两次迭代应该产生相同的结果
    let loader1 = DataLoader::new(dataset(10), 3).unwrap().shuffle(true).seed(42);
    let loader2 = DataLoader::new(dataset(10), 3).unwrap().shuffle(true).seed(42);

    let batches1: Vec<_> = loader1.iter().collect();
    let batches2: Vec<_> = loader2.iter().collect();

    assert_eq!(batches1.len(), batches2.len());
    for (b1, b2) in batches1.iter().zip(batches2.iter()) {
        assert_eq!(b1.0, b2.0);
        assert_eq!(b1.1, b2.1);
    }
}

#[test]
fn test_dataloader_epochs_reshuffle() {
    let loader = DataLoader::new(dataset(50), 50).unwrap().shuffle(true).seed(7);
    let order = |epoch| loader.iter_epoch(epoch).next().unwrap().1;

    assert_eq!(order(1), order(1));
    assert_ne!(order(0), order(1));

    // 打乱只改变顺序
    let mut sorted = order(1);
    sorted.sort_unstable();
    assert_eq!(sorted, (0..50).collect::<Vec<_>>());
}

#[test]
fn test_dataloader_zero_batch_size() {
    assert!(matches!(
        DataLoader::new(dataset(3), 0),
        Err(DataError::FormatError(_))
    ));
}
