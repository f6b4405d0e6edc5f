/*
 * @Description  : 本模块把生成的特征样本保存为灰度图，便于肉眼比较各采样点。
 *                 约定：
 *                 1. 一个样本占一行像素，一个特征占一列像素；
 *                 2. 整个批次共用一次 min-max 归一化（类似 torchvision 的 `normalize=True`），
 *                    所有值都相同时渲染为中灰色。
 */

use std::path::Path;

use image::{GrayImage, ImageResult, Luma};
use ndarray::Array2;

#[cfg(test)]
mod tests;

/// 数值全部相同时使用的灰度
pub const MID_GREY: u8 = 128;

pub struct Vision;

impl Vision {
    /// 将一批样本 [batch_size, features] 转换为灰度图（高 = batch_size，宽 = features）
    pub fn to_luma(samples: &Array2<f32>) -> GrayImage {
        let (height, width) = samples.dim();
        let (min, max) = samples
            .iter()
            .filter(|v| v.is_finite())
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let range = max - min;

        let mut imgbuf = GrayImage::new(width as u32, height as u32);
        for ((y, x), &value) in samples.indexed_iter() {
            let pixel = if range > 0.0 && range.is_finite() {
                let normalized = ((value - min) / range).clamp(0.0, 1.0);
                (normalized * 255.0).round() as u8
            } else {
                MID_GREY
            };
            imgbuf.put_pixel(x as u32, y as u32, Luma([pixel]));
        }
        imgbuf
    }

    /// 保存一批样本为 PNG（格式由扩展名决定）
    pub fn save_image<P: AsRef<Path>>(samples: &Array2<f32>, file_path: P) -> ImageResult<()> {
        Self::to_luma(samples).save(file_path)
    }
}
