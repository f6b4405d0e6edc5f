//! 样本渲染测试

use ndarray::{Array2, array};

use super::{MID_GREY, Vision};

#[test]
fn test_to_luma_shape_and_normalization() {
    let samples = array![[-1.0, 0.0, 1.0], [0.5, -0.5, 1.0]];
    let img = Vision::to_luma(&samples);

    // 宽 = 特征数，高 = 样本数
    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img.get_pixel(0, 0).0, [0]);
    assert_eq!(img.get_pixel(2, 0).0, [255]);
    assert_eq!(img.get_pixel(1, 0).0, [128]);
    // 0.5 -> 0.75 * 255 = 191.25
    assert_eq!(img.get_pixel(0, 1).0, [191]);
}

#[test]
fn test_constant_batch_is_mid_grey() {
    let img = Vision::to_luma(&Array2::from_elem((2, 4), 0.3));
    assert!(img.pixels().all(|p| p.0 == [MID_GREY]));
}

#[test]
fn test_save_image_round_trip() {
    let dir = std::env::temp_dir().join(format!("feature_gan_vision_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("0.png");

    let samples = array![[0.0, 1.0], [1.0, 0.0], [0.5, 0.5]];
    Vision::save_image(&samples, &path).unwrap();

    let loaded = image::open(&path).unwrap().to_luma8();
    assert_eq!(loaded, Vision::to_luma(&samples));
}
