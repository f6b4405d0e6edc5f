use ndarray::Array2;

/// 可训练参数：值与同形状的累积梯度
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub value: Array2<f32>,
    pub grad: Array2<f32>,
}

impl Parameter {
    pub fn new(value: Array2<f32>) -> Self {
        let grad = Array2::zeros(value.raw_dim());
        Self { value, grad }
    }

    /// 梯度清零
    pub fn zero_grad(&mut self) {
        self.grad.fill(0.0);
    }

    /// 元素个数
    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn shape(&self) -> &[usize] {
        self.value.shape()
    }
}
