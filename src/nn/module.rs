/*
 * @Description  : Module trait 定义
 *
 * - `forward()` 不是 trait 方法（各模型的输入不同，如 cGAN 需要额外的标签）
 * - `new()` 不是 trait 方法（参数各异）
 */

use super::Parameter;

/// 由若干层组成的模型
///
/// # 使用示例
///
/// ```ignore
/// struct Mlp {
///     net: Sequential,
/// }
///
/// impl Module for Mlp {
///     fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
///         self.net.parameters_mut()
///     }
///
///     fn set_training(&mut self, training: bool) {
///         self.net.set_training(training);
///     }
/// }
/// ```
pub trait Module {
    /// 获取所有可训练参数（顺序固定，优化器按位置保存状态）
    fn parameters_mut(&mut self) -> Vec<&mut Parameter>;

    /// 切换训练/推理模式（影响 BatchNorm 与 Dropout）
    fn set_training(&mut self, training: bool);

    /// 所有参数梯度清零
    fn zero_grad(&mut self) {
        for param in self.parameters_mut() {
            param.zero_grad();
        }
    }

    /// 获取参数数量
    fn num_params(&mut self) -> usize {
        self.parameters_mut().iter().map(|p| p.len()).sum()
    }
}
