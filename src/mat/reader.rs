//! MAT level-5 二进制格式解析
//!
//! 文件结构：
//! - [0-115] 描述文本
//! - [116-123] subsystem 偏移（忽略）
//! - [124-125] 版本号 0x0100
//! - [126-127] 字节序标记："IM" 为小端，"MI" 为大端
//! - [128+] 数据元素序列，每个元素为 8 字节标签 + 数据，非压缩元素按 8 字节对齐

use std::io::Read;

use flate2::read::ZlibDecoder;
use tracing::debug;

use super::array::{MatClass, MatData};
use super::{ByteOrder, MatArray, MatError, MatFile, MatVariable};

pub(super) const HEADER_LEN: usize = 128;
pub(super) const TEXT_LEN: usize = 116;
pub(super) const MAT_VERSION: u16 = 0x0100;

// 数据元素类型（miXXX）
pub(super) const MI_INT8: u32 = 1;
pub(super) const MI_UINT8: u32 = 2;
pub(super) const MI_INT16: u32 = 3;
pub(super) const MI_UINT16: u32 = 4;
pub(super) const MI_INT32: u32 = 5;
pub(super) const MI_UINT32: u32 = 6;
pub(super) const MI_SINGLE: u32 = 7;
pub(super) const MI_DOUBLE: u32 = 9;
pub(super) const MI_INT64: u32 = 12;
pub(super) const MI_UINT64: u32 = 13;
pub(super) const MI_MATRIX: u32 = 14;
pub(super) const MI_COMPRESSED: u32 = 15;
pub(super) const MI_UTF8: u32 = 16;

// Array Flags 中的标志位
pub(super) const FLAG_COMPLEX: u32 = 0x0800;
pub(super) const FLAG_LOGICAL: u32 = 0x0200;

impl ByteOrder {
    pub(super) fn u16(self, bytes: [u8; 2]) -> u16 {
        match self {
            ByteOrder::Little => u16::from_le_bytes(bytes),
            ByteOrder::Big => u16::from_be_bytes(bytes),
        }
    }

    pub(super) fn u32(self, bytes: [u8; 4]) -> u32 {
        match self {
            ByteOrder::Little => u32::from_le_bytes(bytes),
            ByteOrder::Big => u32::from_be_bytes(bytes),
        }
    }
}

/// 解析完整的 MAT 文件
pub(super) fn parse_file(bytes: &[u8]) -> Result<MatFile, MatError> {
    if bytes.len() < HEADER_LEN {
        return Err(MatError::Header(format!(
            "文件长度 {} 小于 {} 字节的文件头",
            bytes.len(),
            HEADER_LEN
        )));
    }

    let byte_order = match &bytes[126..128] {
        b"IM" => ByteOrder::Little,
        b"MI" => ByteOrder::Big,
        other => {
            return Err(MatError::Header(format!(
                "无效的字节序标记: {:?}（期望 \"IM\" 或 \"MI\"）",
                other
            )));
        }
    };

    let version = byte_order.u16([bytes[124], bytes[125]]);
    if version != MAT_VERSION {
        return Err(MatError::Header(format!(
            "不支持的版本号 0x{version:04x}（期望 0x0100，v7.3 文件基于 HDF5，需先用 MATLAB 另存为 -v7）"
        )));
    }

    let header_text = String::from_utf8_lossy(&bytes[..TEXT_LEN])
        .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string();

    let mut file = MatFile {
        header_text,
        byte_order,
        variables: Vec::new(),
        skipped: Vec::new(),
    };
    read_elements(&bytes[HEADER_LEN..], &mut file)?;
    Ok(file)
}

/// 顺序读取一段缓冲区中的所有顶层数据元素
fn read_elements(buf: &[u8], file: &mut MatFile) -> Result<(), MatError> {
    let mut cursor = Cursor::new(buf, file.byte_order);
    // 不足一个标签的尾部字节视为填充
    while cursor.remaining() >= 8 {
        let element = cursor.read_element()?;
        match element.data_type {
            MI_COMPRESSED => {
                let inflated = inflate(element.data)?;
                read_elements(&inflated, file)?;
            }
            MI_MATRIX => match parse_matrix(element.data, file.byte_order)? {
                Parsed::Array(variable) => file.variables.push(variable),
                Parsed::Skipped { name, reason } => {
                    debug!("跳过变量 `{}`：{}", name, reason);
                    file.skipped.push((name, reason));
                }
            },
            other => debug!("跳过顶层数据元素（类型 {}）", other),
        }
    }
    Ok(())
}

fn inflate(data: &[u8]) -> Result<Vec<u8>, MatError> {
    let mut inflated = Vec::new();
    ZlibDecoder::new(data)
        .read_to_end(&mut inflated)
        .map_err(MatError::Decompress)?;
    Ok(inflated)
}

enum Parsed {
    Array(MatVariable),
    Skipped { name: String, reason: String },
}

/// 解析 miMATRIX 元素的内容
///
/// 子元素依次为：Array Flags、Dimensions、Array Name、Real Part（、Imaginary Part）
fn parse_matrix(payload: &[u8], order: ByteOrder) -> Result<Parsed, MatError> {
    if payload.is_empty() {
        return Ok(Parsed::Skipped {
            name: String::new(),
            reason: "空的矩阵元素".to_string(),
        });
    }

    let mut cursor = Cursor::new(payload, order);

    let flags = cursor.read_element()?;
    if flags.data_type != MI_UINT32 || flags.data.len() < 8 {
        return Err(MatError::Shape(format!(
            "Array Flags 子元素格式错误（类型 {}，长度 {}）",
            flags.data_type,
            flags.data.len()
        )));
    }
    let flag_word = order.u32([flags.data[0], flags.data[1], flags.data[2], flags.data[3]]);
    let class_code = (flag_word & 0xFF) as u8;
    let is_complex = flag_word & FLAG_COMPLEX != 0;
    let is_logical = flag_word & FLAG_LOGICAL != 0;

    let dims_element = cursor.read_element()?;
    let dims = decode_scalars(dims_element.data_type, dims_element.data, order)?
        .into_iter()
        .map(|d| match d {
            Scalar::I(d) if d >= 0 => Ok(d as usize),
            Scalar::U(d) => Ok(d as usize),
            _ => Err(MatError::Shape("维度必须是非负整数".to_string())),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let name_element = cursor.read_element()?;
    let name = String::from_utf8_lossy(name_element.data).into_owned();

    let unsupported = match class_code {
        1 => Some("元胞数组"),
        2 => Some("结构体"),
        3 => Some("对象"),
        4 => Some("字符数组"),
        5 => Some("稀疏矩阵"),
        _ => None,
    };
    if let Some(reason) = unsupported {
        return Ok(Parsed::Skipped {
            name,
            reason: reason.to_string(),
        });
    }
    let Some(class) = MatClass::from_code(class_code) else {
        return Ok(Parsed::Skipped {
            name,
            reason: format!("类别编号 {class_code}"),
        });
    };
    if is_complex {
        return Ok(Parsed::Skipped {
            name,
            reason: "复数数组".to_string(),
        });
    }

    let real = cursor.read_element()?;
    let scalars = decode_scalars(real.data_type, real.data, order)?;
    let data = into_mat_data(scalars, class, is_logical)?;
    let array = MatArray::new(class, dims, data)?;

    Ok(Parsed::Array(MatVariable { name, array }))
}

/// 元素中的单个原始数值
#[derive(Debug, Clone, Copy)]
enum Scalar {
    F(f64),
    I(i64),
    U(u64),
}

/// 按元素类型与字节序把原始字节解码为数值
fn decode_scalars(data_type: u32, bytes: &[u8], order: ByteOrder) -> Result<Vec<Scalar>, MatError> {
    macro_rules! decode {
        ($ty:ty, $variant:ident, $wide:ty) => {{
            const N: usize = std::mem::size_of::<$ty>();
            if bytes.len() % N != 0 {
                return Err(MatError::Shape(format!(
                    "数据长度 {} 不是元素大小 {} 的整数倍",
                    bytes.len(),
                    N
                )));
            }
            bytes
                .chunks_exact(N)
                .map(|chunk| {
                    let mut raw = [0u8; N];
                    raw.copy_from_slice(chunk);
                    let value = match order {
                        ByteOrder::Little => <$ty>::from_le_bytes(raw),
                        ByteOrder::Big => <$ty>::from_be_bytes(raw),
                    };
                    Scalar::$variant(value as $wide)
                })
                .collect()
        }};
    }

    let scalars: Vec<Scalar> = match data_type {
        MI_INT8 => decode!(i8, I, i64),
        MI_UINT8 | MI_UTF8 => decode!(u8, U, u64),
        MI_INT16 => decode!(i16, I, i64),
        MI_UINT16 => decode!(u16, U, u64),
        MI_INT32 => decode!(i32, I, i64),
        MI_UINT32 => decode!(u32, U, u64),
        MI_SINGLE => decode!(f32, F, f64),
        MI_DOUBLE => decode!(f64, F, f64),
        MI_INT64 => decode!(i64, I, i64),
        MI_UINT64 => decode!(u64, U, u64),
        other => return Err(MatError::UnknownDataType(other)),
    };
    Ok(scalars)
}

/// 把原始数值转换为数组类别对应的表示
fn into_mat_data(scalars: Vec<Scalar>, class: MatClass, logical: bool) -> Result<MatData, MatError> {
    if logical {
        let values = scalars
            .into_iter()
            .map(|s| match s {
                Scalar::F(x) => x != 0.0,
                Scalar::I(x) => x != 0,
                Scalar::U(x) => x != 0,
            })
            .collect();
        return Ok(MatData::Bool(values));
    }

    let out_of_range = |value: String| MatError::ValueOutOfRange { value, class };

    if class.is_float() {
        let values = scalars
            .into_iter()
            .map(|s| match s {
                Scalar::F(x) => x,
                Scalar::I(x) => x as f64,
                Scalar::U(x) => x as f64,
            })
            .collect();
        Ok(MatData::Float(values))
    } else if class.is_signed() {
        let values = scalars
            .into_iter()
            .map(|s| match s {
                Scalar::I(x) => Ok(x),
                Scalar::U(x) => i64::try_from(x).map_err(|_| out_of_range(x.to_string())),
                Scalar::F(x) if x.fract() == 0.0 && x >= i64::MIN as f64 && x < i64::MAX as f64 => {
                    Ok(x as i64)
                }
                Scalar::F(x) => Err(out_of_range(x.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MatData::Int(values))
    } else {
        let values = scalars
            .into_iter()
            .map(|s| match s {
                Scalar::U(x) => Ok(x),
                Scalar::I(x) => u64::try_from(x).map_err(|_| out_of_range(x.to_string())),
                Scalar::F(x) if x.fract() == 0.0 && x >= 0.0 && x < u64::MAX as f64 => Ok(x as u64),
                Scalar::F(x) => Err(out_of_range(x.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MatData::UInt(values))
    }
}

/// 数据元素：类型编号 + 数据字节（不含填充）
struct Element<'a> {
    data_type: u32,
    data: &'a [u8],
}

struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
    order: ByteOrder,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8], order: ByteOrder) -> Self {
        Self { buf, pos: 0, order }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], MatError> {
        if n > self.remaining() {
            return Err(MatError::Truncated {
                offset: self.pos,
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u32(&mut self) -> Result<u32, MatError> {
        let b = self.take(4)?;
        Ok(self.order.u32([b[0], b[1], b[2], b[3]]))
    }

    fn align8(&mut self) {
        self.pos = (self.pos.div_ceil(8) * 8).min(self.buf.len());
    }

    /// 读取一个数据元素，并跳过其后的对齐填充
    fn read_element(&mut self) -> Result<Element<'a>, MatError> {
        let word = self.read_u32()?;

        // small data element：高 16 位为字节数，数据紧跟在 4 字节标签之后
        if word >> 16 != 0 {
            let data_type = word & 0xFFFF;
            let nbytes = (word >> 16) as usize;
            if nbytes > 4 {
                return Err(MatError::Shape(format!(
                    "small data element 声明了 {nbytes} 字节（最多 4 字节）"
                )));
            }
            let payload = self.take(4)?;
            return Ok(Element {
                data_type,
                data: &payload[..nbytes],
            });
        }

        let data_type = word;
        let nbytes = self.read_u32()? as usize;
        let data = self.take(nbytes)?;
        // 压缩元素之后没有填充
        if data_type != MI_COMPRESSED {
            self.align8();
        }
        Ok(Element { data_type, data })
    }
}
