/*
 * @Description  : DataLoader - PyTorch 风格的数据批量加载器
 *
 * 提供统一的数据迭代 API，支持：
 * - 自动分批 (batch_size)
 * - 随机打乱 (shuffle)，每个 epoch 可用不同的种子
 * - 丢弃不完整批次 (drop_last)
 */

use ndarray::{Array2, Axis};
use rand::SeedableRng;
use rand::seq::SliceRandom;

use super::FeatureDataset;
use super::error::DataError;

/// DataLoader - PyTorch 风格的数据批量加载器
///
/// # 示例
/// ```ignore
/// let loader = DataLoader::new(dataset, 64)?
///     .shuffle(true)
///     .seed(42);
///
/// for epoch in 0..n_epochs {
///     for (x_batch, y_batch) in loader.iter_epoch(epoch) {
///         // ...
///     }
/// }
/// ```
pub struct DataLoader {
    dataset: FeatureDataset,
    batch_size: usize,
    shuffle: bool,
    drop_last: bool,
    seed: Option<u64>,
}

impl DataLoader {
    /// 创建新的 DataLoader
    ///
    /// # 参数
    /// - `dataset`: 数据集
    /// - `batch_size`: 批大小，须大于 0
    pub fn new(dataset: FeatureDataset, batch_size: usize) -> Result<Self, DataError> {
        if batch_size == 0 {
            return Err(DataError::FormatError("batch_size 必须大于 0".to_string()));
        }
        Ok(Self {
            dataset,
            batch_size,
            shuffle: false,
            drop_last: false,
            seed: None,
        })
    }

    /// 设置是否打乱数据
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// 设置是否丢弃最后一个不完整的批次
    pub fn drop_last(mut self, drop_last: bool) -> Self {
        self.drop_last = drop_last;
        self
    }

    /// 设置随机种子（用于 shuffle）
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// 获取批次数量
    pub fn num_batches(&self) -> usize {
        let n = self.dataset.len();
        if self.drop_last {
            n / self.batch_size
        } else {
            n.div_ceil(self.batch_size)
        }
    }

    /// 获取数据集大小
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    /// 检查是否为空
    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    pub fn dataset(&self) -> &FeatureDataset {
        &self.dataset
    }

    /// 创建迭代器（等同于第 0 个 epoch）
    pub fn iter(&self) -> DataLoaderIterator<'_> {
        self.iter_epoch(0)
    }

    /// 创建第`epoch`轮的迭代器
    ///
    /// 设置了种子时，第`epoch`轮用 `seed + epoch` 打乱，
    /// 这样每轮顺序不同，且整个训练过程可复现。
    pub fn iter_epoch(&self, epoch: usize) -> DataLoaderIterator<'_> {
        let mut indices: Vec<usize> = (0..self.dataset.len()).collect();

        if self.shuffle {
            if let Some(seed) = self.seed {
                let mut rng = rand::rngs::StdRng::seed_from_u64(seed.wrapping_add(epoch as u64));
                indices.shuffle(&mut rng);
            } else {
                let mut rng = rand::thread_rng();
                indices.shuffle(&mut rng);
            }
        }

        DataLoaderIterator {
            loader: self,
            indices,
            current_batch: 0,
        }
    }
}

/// DataLoader 迭代器
pub struct DataLoaderIterator<'a> {
    loader: &'a DataLoader,
    indices: Vec<usize>,
    current_batch: usize,
}

impl Iterator for DataLoaderIterator<'_> {
    type Item = (Array2<f32>, Vec<usize>);

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.indices.len();
        let batch_size = self.loader.batch_size;
        let start = self.current_batch * batch_size;

        if start >= n {
            return None;
        }

        let end = (start + batch_size).min(n);

        // 如果 drop_last 且批次不完整，则结束
        if self.loader.drop_last && end - start < batch_size {
            return None;
        }

        self.current_batch += 1;

        let batch_indices = &self.indices[start..end];
        let dataset = &self.loader.dataset;
        let features = dataset.features().select(Axis(0), batch_indices);
        let labels = batch_indices.iter().map(|&i| dataset.labels()[i]).collect();

        Some((features, labels))
    }
}
