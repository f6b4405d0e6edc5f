use thiserror::Error;
mod ops;
pub use self::ops::*;

/// 神经网络前向/反向计算中的错误
#[derive(Error, Debug, PartialEq, Eq)]
pub enum NnError {
    // 矩阵二元运算
    #[error(
        "形状不一致，故无法{operator}：第一个矩阵的形状为{left:?}，第二个矩阵的形状为{right:?}"
    )]
    ShapeMismatch {
        operator: Operator,
        left: Vec<usize>,
        right: Vec<usize>,
    },

    // 数字比较用
    #[error("{value_name}须{operator}{threshold}，实际为{actual}")]
    ValueMustSatisfyComparison {
        value_name: String,
        operator: ComparisonOperator,
        threshold: usize,
        actual: usize,
    },

    #[error("类别标签{label}越界：嵌入表只有{num_embeddings}行")]
    LabelOutOfRange { label: usize, num_embeddings: usize },

    #[error("反向传播前必须先执行前向传播（层：{0}）")]
    BackwardBeforeForward(&'static str),

    #[error("批次为空")]
    EmptyBatch,
}
