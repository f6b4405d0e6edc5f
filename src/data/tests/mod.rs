mod convert;
mod dataloader;

use std::path::PathBuf;

/// 每个测试独立的临时目录
fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("feature_gan_data_{}_{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
