//! 数据变换函数
//!
//! 生成器输出经过 tanh，值域为 [-1, 1]；原始特征（如 SURF 直方图）通常不在这个范围，
//! 训练前可按列缩放到同一值域。

use ndarray::{Array2, Axis};

/// 按列做 min-max 缩放到 [-1, 1]（原地）
///
/// 常数列映射为 0。
///
/// # 示例
/// ```ignore
/// let mut x = array![[0.0, 5.0], [10.0, 5.0]];
/// scale_to_symmetric_unit(&mut x);
/// // 结果: [[-1, 0], [1, 0]]
/// ```
pub fn scale_to_symmetric_unit(features: &mut Array2<f32>) {
    for mut column in features.axis_iter_mut(Axis(1)) {
        let (min, max) = column
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &x| {
                (lo.min(x), hi.max(x))
            });
        let range = max - min;
        if range > 0.0 && range.is_finite() {
            column.mapv_inplace(|x| (x - min) / range * 2.0 - 1.0);
        } else {
            column.fill(0.0);
        }
    }
}
