use std::fmt::{self, Display};

/// 矩阵的二元运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    MatMul,
    Concat,
    Normalize,
    Loss,
    Backward,
}
impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operation_name = match self {
            Operator::MatMul => "矩阵相乘",
            Operator::Concat => "按列拼接",
            Operator::Normalize => "批归一化",
            Operator::Loss => "计算损失",
            Operator::Backward => "反向传播",
        };
        write!(f, "{}", operation_name)
    }
}

/// 比较运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    GreaterOrEqual,
    LessOrEqual,
}
impl Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator_name = match self {
            ComparisonOperator::GreaterOrEqual => "≥",
            ComparisonOperator::LessOrEqual => "≤",
        };
        write!(f, "{}", operator_name)
    }
}
