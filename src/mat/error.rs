//! MAT 文件读取错误类型定义

use thiserror::Error;

use super::MatClass;

/// MAT 文件解析相关错误
#[derive(Debug, Error)]
pub enum MatError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 文件头无效（长度不足、字节序标记错误等）
    #[error("文件头无效: {0}")]
    Header(String),

    /// 数据元素被截断
    #[error("数据在偏移 {offset} 处被截断：需要 {needed} 字节，剩余 {remaining} 字节")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// 未知的数据元素类型（miXXX）
    #[error("未知的数据类型编号: {0}")]
    UnknownDataType(u32),

    /// 读取时被跳过的变量（元胞、结构体、复数、未知类别等）
    #[error("变量 `{name}` 暂不支持：{reason}")]
    Unsupported { name: String, reason: String },

    /// 变量不存在
    #[error("文件中不存在变量 `{0}`")]
    MissingVariable(String),

    /// JSON 无法表示 NaN/Inf
    #[error("含有非有限浮点数 {0}，无法写入 JSON")]
    NonFinite(f64),

    /// 存储值超出数组类别的取值范围
    #[error("数值 {value} 无法表示为 {class:?}")]
    ValueOutOfRange { value: String, class: MatClass },

    /// zlib 解压失败
    #[error("解压 miCOMPRESSED 元素失败: {0}")]
    Decompress(#[source] std::io::Error),

    /// 维度与数据长度不一致
    #[error("形状错误: {0}")]
    Shape(String),
}
