/*
 * @Description  : MAT -> JSON 转换
 *
 * 只保留指定的变量（默认 `Ds` 与 `Ls`），每个变量写成按行嵌套的数值列表，
 * 输出文件名为原文件名后加 `.json`，如 `OfficeCaltech_1_SourceData.mat.json`。
 */

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{info, warn};

use super::datasets::{DATA_KEY, LABEL_KEY};
use super::error::DataError;
use crate::mat::MatFile;

/// 默认转换的变量
pub const DEFAULT_KEYS: [&str; 2] = [DATA_KEY, LABEL_KEY];

/// 把 MAT 文件中名字在`keys`里的变量转换为 JSON 对象
///
/// 文件中不存在的键直接忽略；受支持的类型之外（如元胞数组）的同名变量报错。
pub fn mat_to_json_value(file: &MatFile, keys: &[&str]) -> Result<Value, DataError> {
    let mut object = Map::new();
    for key in keys {
        match file.variable(key) {
            Ok(array) => {
                object.insert((*key).to_string(), array.to_json()?);
            }
            Err(crate::mat::MatError::MissingVariable(_)) => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(Value::Object(object))
}

/// `<mat_path>.json`
pub fn json_path_for(mat_path: &Path) -> PathBuf {
    let mut name = OsString::from(mat_path.as_os_str());
    name.push(".json");
    PathBuf::from(name)
}

/// 转换一个 MAT 文件，返回写出的 JSON 路径
pub fn mat_to_json<P: AsRef<Path>>(mat_path: P, keys: &[&str]) -> Result<PathBuf, DataError> {
    let mat_path = mat_path.as_ref();
    if !mat_path.exists() {
        return Err(DataError::FileNotFound(mat_path.to_path_buf()));
    }

    let file = MatFile::open(mat_path)?;
    let value = mat_to_json_value(&file, keys)?;
    if value.as_object().is_some_and(Map::is_empty) {
        warn!("{:?} 中没有找到任何键 {:?}，写出空对象", mat_path, keys);
    }

    let json_path = json_path_for(mat_path);
    let mut writer = BufWriter::new(File::create(&json_path)?);
    serde_json::to_writer(&mut writer, &value)?;
    writer.flush()?;

    info!("已转换 {:?} -> {:?}", mat_path, json_path);
    Ok(json_path)
}
