//! MAT level-5 文件写出
//!
//! 只写数值类与逻辑类数组；短变量名（≤4 字节）使用 small data element，
//! 开启压缩时每个变量各自包成一个 miCOMPRESSED 元素。

use std::fs;
use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::ZlibEncoder;

use super::array::{MatClass, MatData};
use super::reader::{
    FLAG_LOGICAL, HEADER_LEN, MAT_VERSION, MI_COMPRESSED, MI_DOUBLE, MI_INT8, MI_INT16, MI_INT32,
    MI_INT64, MI_MATRIX, MI_SINGLE, MI_UINT8, MI_UINT16, MI_UINT32, MI_UINT64, TEXT_LEN,
};
use super::{ByteOrder, MatError, MatVariable};

/// MAT 文件写出器
///
/// # 示例
/// ```ignore
/// let writer = MatWriter::new().compress(true);
/// writer.save("samples.mat", &[MatVariable { name: "Ds".into(), array }])?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MatWriter {
    byte_order: ByteOrder,
    compress: bool,
}

impl Default for MatWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl MatWriter {
    /// 默认小端、不压缩
    pub fn new() -> Self {
        Self {
            byte_order: ByteOrder::Little,
            compress: false,
        }
    }

    pub fn byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// 写入文件
    pub fn save<P: AsRef<Path>>(&self, path: P, variables: &[MatVariable]) -> Result<(), MatError> {
        let bytes = self.to_bytes(variables)?;
        fs::write(path.as_ref(), bytes)?;
        Ok(())
    }

    /// 序列化为完整的文件字节（含 128 字节文件头）
    pub fn to_bytes(&self, variables: &[MatVariable]) -> Result<Vec<u8>, MatError> {
        let mut out = self.header();
        for variable in variables {
            let matrix = self.matrix_element(variable)?;
            if self.compress {
                let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(&matrix)?;
                let compressed = encoder.finish()?;
                out.extend_from_slice(&self.u32_bytes(MI_COMPRESSED));
                out.extend_from_slice(&self.u32_bytes(compressed.len() as u32));
                out.extend_from_slice(&compressed);
            } else {
                out.extend_from_slice(&matrix);
            }
        }
        Ok(out)
    }

    fn header(&self) -> Vec<u8> {
        let mut header = Vec::with_capacity(HEADER_LEN);
        let text = format!(
            "MATLAB 5.0 MAT-file, Platform: {}, Created by: feature_gan {}",
            std::env::consts::OS,
            env!("CARGO_PKG_VERSION")
        );
        header.extend(text.bytes().take(TEXT_LEN));
        header.resize(TEXT_LEN, b' ');
        // subsystem 偏移
        header.extend_from_slice(&[0u8; 8]);
        match self.byte_order {
            ByteOrder::Little => {
                header.extend_from_slice(&MAT_VERSION.to_le_bytes());
                header.extend_from_slice(b"IM");
            }
            ByteOrder::Big => {
                header.extend_from_slice(&MAT_VERSION.to_be_bytes());
                header.extend_from_slice(b"MI");
            }
        }
        header
    }

    fn u32_bytes(&self, value: u32) -> [u8; 4] {
        match self.byte_order {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        }
    }

    /// 标签 + 数据 + 8 字节对齐填充
    fn element(&self, data_type: u32, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(8 + data.len().div_ceil(8) * 8);
        out.extend_from_slice(&self.u32_bytes(data_type));
        out.extend_from_slice(&self.u32_bytes(data.len() as u32));
        out.extend_from_slice(data);
        out.resize(8 + data.len().div_ceil(8) * 8, 0);
        out
    }

    /// small data element：4 字节标签（高 16 位为字节数）+ 4 字节数据
    fn small_element(&self, data_type: u32, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(8);
        out.extend_from_slice(&self.u32_bytes(((data.len() as u32) << 16) | data_type));
        out.extend_from_slice(data);
        out.resize(8, 0);
        out
    }

    fn matrix_element(&self, variable: &MatVariable) -> Result<Vec<u8>, MatError> {
        let array = &variable.array;
        let (class, logical) = match array.data {
            MatData::Bool(_) => (MatClass::UInt8, true),
            _ => (array.class, false),
        };

        let mut flags = Vec::with_capacity(8);
        let flag_word = class.code() as u32 | if logical { FLAG_LOGICAL } else { 0 };
        flags.extend_from_slice(&self.u32_bytes(flag_word));
        flags.extend_from_slice(&self.u32_bytes(0));

        let mut dims = Vec::with_capacity(array.dims.len() * 4);
        for &d in &array.dims {
            let d = i32::try_from(d).map_err(|_| MatError::Shape(format!("维度 {d} 超出 int32")))?;
            dims.extend_from_slice(&self.i32_bytes(d));
        }

        let name = variable.name.as_bytes();
        let name_element = if !name.is_empty() && name.len() <= 4 {
            self.small_element(MI_INT8, name)
        } else {
            self.element(MI_INT8, name)
        };

        let (real_type, real) = self.encode_real(class, &array.data)?;

        let mut payload = self.element(MI_UINT32, &flags);
        payload.extend(self.element(MI_INT32, &dims));
        payload.extend(name_element);
        payload.extend(self.element(real_type, &real));
        Ok(self.element(MI_MATRIX, &payload))
    }

    fn i32_bytes(&self, value: i32) -> [u8; 4] {
        match self.byte_order {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        }
    }

    /// 按数组类别选择存储类型并编码实部
    fn encode_real(&self, class: MatClass, data: &MatData) -> Result<(u32, Vec<u8>), MatError> {
        let order = self.byte_order;
        macro_rules! encode {
            ($values:expr, $ty:ty, $data_type:expr) => {{
                let mut bytes = Vec::with_capacity($values.len() * std::mem::size_of::<$ty>());
                for &v in $values.iter() {
                    let narrow = <$ty>::try_from(v).map_err(|_| MatError::ValueOutOfRange {
                        value: v.to_string(),
                        class,
                    })?;
                    match order {
                        ByteOrder::Little => bytes.extend_from_slice(&narrow.to_le_bytes()),
                        ByteOrder::Big => bytes.extend_from_slice(&narrow.to_be_bytes()),
                    }
                }
                ($data_type, bytes)
            }};
        }

        let encoded = match (class, data) {
            (_, MatData::Bool(v)) => (MI_UINT8, v.iter().map(|&b| b as u8).collect()),
            (MatClass::Double, MatData::Float(v)) => {
                let mut bytes = Vec::with_capacity(v.len() * 8);
                for x in v {
                    match order {
                        ByteOrder::Little => bytes.extend_from_slice(&x.to_le_bytes()),
                        ByteOrder::Big => bytes.extend_from_slice(&x.to_be_bytes()),
                    }
                }
                (MI_DOUBLE, bytes)
            }
            (MatClass::Single, MatData::Float(v)) => {
                let mut bytes = Vec::with_capacity(v.len() * 4);
                for &x in v {
                    let x = x as f32;
                    match order {
                        ByteOrder::Little => bytes.extend_from_slice(&x.to_le_bytes()),
                        ByteOrder::Big => bytes.extend_from_slice(&x.to_be_bytes()),
                    }
                }
                (MI_SINGLE, bytes)
            }
            (MatClass::Int8, MatData::Int(v)) => encode!(v, i8, MI_INT8),
            (MatClass::Int16, MatData::Int(v)) => encode!(v, i16, MI_INT16),
            (MatClass::Int32, MatData::Int(v)) => encode!(v, i32, MI_INT32),
            (MatClass::Int64, MatData::Int(v)) => encode!(v, i64, MI_INT64),
            (MatClass::UInt8, MatData::UInt(v)) => encode!(v, u8, MI_UINT8),
            (MatClass::UInt16, MatData::UInt(v)) => encode!(v, u16, MI_UINT16),
            (MatClass::UInt32, MatData::UInt(v)) => encode!(v, u32, MI_UINT32),
            (MatClass::UInt64, MatData::UInt(v)) => encode!(v, u64, MI_UINT64),
            (class, _) => {
                return Err(MatError::Shape(format!(
                    "数组类别 {class:?} 与数据表示不匹配"
                )));
            }
        };
        Ok(encoded)
    }
}
