/*
 * @Description  : MATLAB level-5 MAT 文件读取
 *
 * 支持：
 * - 大小端两种字节序（文件头 "IM" / "MI" 标记）
 * - miCOMPRESSED（zlib）压缩元素
 * - small data element 紧凑格式
 * - 数值类与逻辑类数组
 *
 * 写出见 [`MatWriter`]。
 *
 * 元胞、结构体、对象、字符、稀疏、复数及未知类别（如 MCOS 对象）的数组在读取时跳过，
 * 按名字取这类变量会得到 `MatError::Unsupported`。
 */

mod array;
mod error;
mod reader;
mod writer;

#[cfg(test)]
mod tests;

use std::fs;
use std::path::Path;

pub use array::{MatArray, MatClass, MatData};
pub use error::MatError;
pub use writer::MatWriter;

/// 文件字节序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

/// 文件中的一个具名变量
#[derive(Debug, Clone, PartialEq)]
pub struct MatVariable {
    pub name: String,
    pub array: MatArray,
}

/// 解析后的 MAT 文件
#[derive(Debug, Clone)]
pub struct MatFile {
    /// 文件头的描述文本（去掉尾部空白）
    header_text: String,
    byte_order: ByteOrder,
    variables: Vec<MatVariable>,
    /// 被跳过的变量：(名字, 原因)
    skipped: Vec<(String, String)>,
}

impl MatFile {
    /// 从磁盘读取并解析 MAT 文件
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MatError> {
        let bytes = fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// 从内存中的字节解析 MAT 文件
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MatError> {
        reader::parse_file(bytes)
    }

    pub fn header_text(&self) -> &str {
        &self.header_text
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// 按文件中出现的顺序返回所有受支持的变量
    pub fn variables(&self) -> &[MatVariable] {
        &self.variables
    }

    /// 按名字查找变量，不存在或被跳过时返回 `None`
    pub fn get(&self, name: &str) -> Option<&MatArray> {
        self.variables
            .iter()
            .find(|var| var.name == name)
            .map(|var| &var.array)
    }

    /// 按名字查找变量，并区分"不存在"与"不支持"两种失败
    pub fn variable(&self, name: &str) -> Result<&MatArray, MatError> {
        if let Some(array) = self.get(name) {
            return Ok(array);
        }
        match self.skipped.iter().find(|(skipped, _)| skipped == name) {
            Some((_, reason)) => Err(MatError::Unsupported {
                name: name.to_string(),
                reason: reason.clone(),
            }),
            None => Err(MatError::MissingVariable(name.to_string())),
        }
    }
}
