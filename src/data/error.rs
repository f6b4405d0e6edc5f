//! 数据加载错误类型定义

use std::path::PathBuf;
use thiserror::Error;

use crate::mat::MatError;

/// 数据加载相关错误
#[derive(Debug, Error)]
pub enum DataError {
    /// 文件未找到
    #[error("文件未找到: {0}")]
    FileNotFound(PathBuf),

    /// IO 错误
    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    /// 格式错误（如 JSON 结构不是嵌套数组）
    #[error("格式错误: {0}")]
    FormatError(String),

    /// 文件中缺少约定的键/变量
    #[error("{path:?} 中缺少键 `{key}`")]
    MissingKey { key: String, path: PathBuf },

    /// 索引越界
    #[error("索引越界: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// 形状不匹配
    #[error("形状不匹配: 期望 {expected:?}, 实际 {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// 数据与标签的样本数不一致
    #[error("数据与标签文件不匹配: 数据有 {data_rows} 行, 标签有 {label_rows} 行")]
    LengthMismatch { data_rows: usize, label_rows: usize },

    /// 标签不是非负整数
    #[error("第 {index} 个标签无效: {value}（须为非负整数）")]
    InvalidLabel { index: usize, value: String },

    /// MAT 文件解析错误
    #[error("MAT 文件错误: {0}")]
    Mat(#[from] MatError),

    /// JSON 解析错误
    #[error("JSON 错误: {0}")]
    Json(#[from] serde_json::Error),
}
