//! 表格特征数据集
//!
//! 一行一个样本：特征矩阵 `Ds` 为 [N, features]，标签 `Ls` 为 N 个整数类别。
//! 两者可以来自 MAT 文件，也可以来自 `convert` 生成的 JSON 文件。

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use ndarray::{Array1, Array2, ArrayView1};
use serde_json::Value;

use crate::data::error::DataError;
use crate::mat::{MatArray, MatError, MatFile};

/// 数据文件中特征矩阵的键
pub const DATA_KEY: &str = "Ds";
/// 标签文件中标签向量的键
pub const LABEL_KEY: &str = "Ls";

/// 特征 + 标签数据集
///
/// 唯一的不变量：特征行数 == 标签个数，在构造时检查。
#[derive(Debug, Clone)]
pub struct FeatureDataset {
    /// 特征矩阵 [N, features]
    features: Array2<f32>,
    /// 类别标签 [N]
    labels: Array1<usize>,
}

impl FeatureDataset {
    /// 由特征矩阵与标签向量创建数据集
    ///
    /// # 错误
    /// 样本数不一致时返回 [`DataError::LengthMismatch`]
    pub fn new(features: Array2<f32>, labels: Array1<usize>) -> Result<Self, DataError> {
        if features.nrows() != labels.len() {
            return Err(DataError::LengthMismatch {
                data_rows: features.nrows(),
                label_rows: labels.len(),
            });
        }
        Ok(Self { features, labels })
    }

    /// 从两个 JSON 文件加载：数据文件取键 `Ds`，标签文件取键 `Ls`
    pub fn from_json_files<P: AsRef<Path>, Q: AsRef<Path>>(
        data_json: P,
        label_json: Q,
    ) -> Result<Self, DataError> {
        let data_path = data_json.as_ref();
        let label_path = label_json.as_ref();

        let data = read_json(data_path)?;
        let features = json_matrix(json_key(&data, DATA_KEY, data_path)?)?;

        let labels = read_json(label_path)?;
        let labels = json_labels(json_key(&labels, LABEL_KEY, label_path)?)?;

        Self::new(features, labels)
    }

    /// 直接从两个 MAT 文件加载
    pub fn from_mat_files<P: AsRef<Path>, Q: AsRef<Path>>(
        data_mat: P,
        label_mat: Q,
    ) -> Result<Self, DataError> {
        let data_path = data_mat.as_ref();
        let label_path = label_mat.as_ref();

        let data = open_mat(data_path)?;
        let features = mat_key(&data, DATA_KEY, data_path)?.to_matrix_f32()?;

        let labels = open_mat(label_path)?;
        let labels = mat_labels(mat_key(&labels, LABEL_KEY, label_path)?)?;

        Self::new(features, labels)
    }

    /// 返回数据集中的样本数量
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// 数据集是否为空
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// 每个样本的特征维数
    pub fn feature_dim(&self) -> usize {
        self.features.ncols()
    }

    /// 类别数（最大标签 + 1），空数据集为 0
    pub fn num_classes(&self) -> usize {
        self.labels.iter().max().map_or(0, |&max| max + 1)
    }

    /// 获取第 index 个样本
    ///
    /// # 返回
    /// (feature, label) 元组，feature 形状为 [features]
    pub fn get(&self, index: usize) -> Result<(ArrayView1<'_, f32>, usize), DataError> {
        if index >= self.len() {
            return Err(DataError::IndexOutOfBounds {
                index,
                len: self.len(),
            });
        }
        Ok((self.features.row(index), self.labels[index]))
    }

    /// 获取所有特征（用于批量处理）
    pub fn features(&self) -> &Array2<f32> {
        &self.features
    }

    /// 获取特征的可变引用（用于原地变换）
    pub fn features_mut(&mut self) -> &mut Array2<f32> {
        &mut self.features
    }

    /// 获取所有标签
    pub fn labels(&self) -> &Array1<usize> {
        &self.labels
    }

    /// 所有标签减去`offset`，用于把 MATLAB 的 1 起始标签转为 0 起始
    pub fn shift_labels(&mut self, offset: usize) -> Result<(), DataError> {
        if let Some((index, &label)) = self.labels.iter().enumerate().find(|(_, l)| **l < offset) {
            return Err(DataError::InvalidLabel {
                index,
                value: format!("{label} - {offset}"),
            });
        }
        self.labels.mapv_inplace(|label| label - offset);
        Ok(())
    }
}

fn read_json(path: &Path) -> Result<Value, DataError> {
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataError::FileNotFound(path.to_path_buf()),
        _ => DataError::IoError(e),
    })?;
    Ok(serde_json::from_str(&text)?)
}

fn open_mat(path: &Path) -> Result<MatFile, DataError> {
    if !path.exists() {
        return Err(DataError::FileNotFound(path.to_path_buf()));
    }
    Ok(MatFile::open(path)?)
}

fn json_key<'a>(value: &'a Value, key: &str, path: &Path) -> Result<&'a Value, DataError> {
    value.get(key).ok_or_else(|| DataError::MissingKey {
        key: key.to_string(),
        path: path.to_path_buf(),
    })
}

fn mat_key<'a>(file: &'a MatFile, key: &str, path: &Path) -> Result<&'a MatArray, DataError> {
    match file.variable(key) {
        Ok(array) => Ok(array),
        Err(MatError::MissingVariable(_)) => Err(DataError::MissingKey {
            key: key.to_string(),
            path: path.to_path_buf(),
        }),
        Err(e) => Err(e.into()),
    }
}

/// JSON 标量转为数值，逻辑值按 0/1 处理（与 MAT 逻辑数组的读取一致）
fn json_number(value: &Value) -> Option<f64> {
    match value {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        other => other.as_f64(),
    }
}

/// 嵌套数组 `[[...], [...]]` -> [N, features] 矩阵，要求每行等长
fn json_matrix(value: &Value) -> Result<Array2<f32>, DataError> {
    let rows = value
        .as_array()
        .ok_or_else(|| DataError::FormatError("特征数据须为二维数组".to_string()))?;
    let n_rows = rows.len();
    let n_cols = rows
        .first()
        .and_then(Value::as_array)
        .map_or(0, |row| row.len());

    let mut data = Vec::with_capacity(n_rows * n_cols);
    for (i, row) in rows.iter().enumerate() {
        let row = row
            .as_array()
            .ok_or_else(|| DataError::FormatError(format!("第 {i} 行不是数组")))?;
        if row.len() != n_cols {
            return Err(DataError::ShapeMismatch {
                expected: vec![n_cols],
                got: vec![row.len()],
            });
        }
        for x in row {
            let x = json_number(x)
                .ok_or_else(|| DataError::FormatError(format!("第 {i} 行含有非数值元素 {x}")))?;
            data.push(x as f32);
        }
    }

    Array2::from_shape_vec((n_rows, n_cols), data)
        .map_err(|e| DataError::FormatError(e.to_string()))
}

/// 标签数组：可以是 `[1, 2]`，也可以是 loadmat 得到的列向量 `[[1], [2]]`
fn json_labels(value: &Value) -> Result<Array1<usize>, DataError> {
    let items = value
        .as_array()
        .ok_or_else(|| DataError::FormatError("标签须为数组".to_string()))?;

    let labels = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let scalar = match item {
                Value::Array(inner) if inner.len() == 1 => &inner[0],
                other => other,
            };
            match json_number(scalar) {
                Some(x) => to_label(index, x),
                None => Err(DataError::InvalidLabel {
                    index,
                    value: item.to_string(),
                }),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Array1::from_vec(labels))
}

/// MAT 标签须为向量（N×1 或 1×N）
fn mat_labels(array: &MatArray) -> Result<Array1<usize>, DataError> {
    let longest = array.dims.iter().copied().max().unwrap_or(1);
    if !array.is_empty() && array.len() != longest {
        return Err(DataError::ShapeMismatch {
            expected: vec![array.len(), 1],
            got: array.dims.clone(),
        });
    }
    let labels = (0..array.len())
        .map(|index| to_label(index, array.data.get_f64(index).unwrap_or(f64::NAN)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Array1::from_vec(labels))
}

fn to_label(index: usize, x: f64) -> Result<usize, DataError> {
    if x.is_finite() && x >= 0.0 && x.fract() == 0.0 {
        Ok(x as usize)
    } else {
        Err(DataError::InvalidLabel {
            index,
            value: x.to_string(),
        })
    }
}
