/*
 * @Description  : 优化器基础trait和辅助结构
 */

use crate::errors::NnError;
use crate::nn::Parameter;

/// 优化器核心 trait
///
/// 参数由调用方按固定顺序传入（通常是 `Module::parameters_mut()`），
/// 优化器按位置保存各参数的状态，所以每个模型应有自己的优化器实例：
///
/// ```ignore
/// optimizer.zero_grad(&mut model.parameters_mut());
/// let (loss, grad) = criterion.forward(&model.forward(&x)?, &y)?;
/// model.backward(&grad)?;
/// optimizer.step(&mut model.parameters_mut())?; // 只更新参数
/// ```
pub trait Optimizer {
    /// 参数更新（使用已累加的梯度）
    fn step(&mut self, params: &mut [&mut Parameter]) -> Result<(), NnError>;

    /// 梯度清零
    fn zero_grad(&self, params: &mut [&mut Parameter]) {
        for param in params.iter_mut() {
            param.zero_grad();
        }
    }

    /// 重置累积状态
    fn reset(&mut self);

    /// 获取学习率
    fn learning_rate(&self) -> f32;

    /// 设置学习率
    fn set_learning_rate(&mut self, lr: f32);
}

/// 优化器状态管理（内部实现，不对外暴露）
#[derive(Debug, Clone)]
pub(crate) struct OptimizerState {
    learning_rate: f32,
    /// 已执行的 step 次数
    t: usize,
}

impl OptimizerState {
    pub(crate) const fn new(learning_rate: f32) -> Self {
        Self { learning_rate, t: 0 }
    }

    pub(crate) const fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    pub(crate) const fn set_learning_rate(&mut self, lr: f32) {
        self.learning_rate = lr;
    }

    /// 步数加一并返回新步数
    pub(crate) fn tick(&mut self) -> usize {
        self.t += 1;
        self.t
    }

    pub(crate) const fn steps(&self) -> usize {
        self.t
    }

    pub(crate) fn reset(&mut self) {
        self.t = 0;
    }
}
