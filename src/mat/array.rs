//! MAT 数组的内存表示，以及到 JSON / ndarray 的转换

use ndarray::{Array2, ShapeBuilder};
use serde_json::{Number, Value};

use super::MatError;

/// 数组类别（mxCLASS），仅包含受支持的数值类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatClass {
    Double,
    Single,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
}

impl MatClass {
    /// 由 Array Flags 中的类别编号得到数值类别，非数值类别返回 `None`
    pub fn from_code(code: u8) -> Option<Self> {
        let class = match code {
            6 => MatClass::Double,
            7 => MatClass::Single,
            8 => MatClass::Int8,
            9 => MatClass::UInt8,
            10 => MatClass::Int16,
            11 => MatClass::UInt16,
            12 => MatClass::Int32,
            13 => MatClass::UInt32,
            14 => MatClass::Int64,
            15 => MatClass::UInt64,
            _ => return None,
        };
        Some(class)
    }

    /// Array Flags 中的类别编号
    pub fn code(&self) -> u8 {
        match self {
            MatClass::Double => 6,
            MatClass::Single => 7,
            MatClass::Int8 => 8,
            MatClass::UInt8 => 9,
            MatClass::Int16 => 10,
            MatClass::UInt16 => 11,
            MatClass::Int32 => 12,
            MatClass::UInt32 => 13,
            MatClass::Int64 => 14,
            MatClass::UInt64 => 15,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, MatClass::Double | MatClass::Single)
    }

    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            MatClass::Int8 | MatClass::Int16 | MatClass::Int32 | MatClass::Int64
        )
    }
}

/// 数组数据（按列优先顺序存放，与文件一致）
///
/// 变体由数组类别决定，而非磁盘上的元素类型：
/// MATLAB 常把 double 数组压缩存成 miUINT8 等更窄的类型。
#[derive(Debug, Clone, PartialEq)]
pub enum MatData {
    Float(Vec<f64>),
    Int(Vec<i64>),
    UInt(Vec<u64>),
    Bool(Vec<bool>),
}

impl MatData {
    pub fn len(&self) -> usize {
        match self {
            MatData::Float(v) => v.len(),
            MatData::Int(v) => v.len(),
            MatData::UInt(v) => v.len(),
            MatData::Bool(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 第`index`个元素转换为 f64（用于标签等数值读取）
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        match self {
            MatData::Float(v) => v.get(index).copied(),
            MatData::Int(v) => v.get(index).map(|&x| x as f64),
            MatData::UInt(v) => v.get(index).map(|&x| x as f64),
            MatData::Bool(v) => v.get(index).map(|&x| if x { 1.0 } else { 0.0 }),
        }
    }

    fn json_scalar(&self, index: usize) -> Result<Value, MatError> {
        let value = match self {
            MatData::Float(v) => {
                let x = v[index];
                Value::Number(Number::from_f64(x).ok_or(MatError::NonFinite(x))?)
            }
            MatData::Int(v) => Value::from(v[index]),
            MatData::UInt(v) => Value::from(v[index]),
            MatData::Bool(v) => Value::Bool(v[index]),
        };
        Ok(value)
    }
}

/// 一个数值（或逻辑）数组
#[derive(Debug, Clone, PartialEq)]
pub struct MatArray {
    pub class: MatClass,
    pub dims: Vec<usize>,
    pub data: MatData,
}

impl MatArray {
    /// 创建数组，检查维度之积与数据长度一致
    pub fn new(class: MatClass, dims: Vec<usize>, data: MatData) -> Result<Self, MatError> {
        let expected = dims
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or_else(|| MatError::Shape(format!("维度 {dims:?} 的元素总数溢出")))?;
        if expected != data.len() {
            return Err(MatError::Shape(format!(
                "维度 {:?} 需要 {} 个元素，实际有 {} 个",
                dims,
                expected,
                data.len()
            )));
        }
        Ok(Self { class, dims, data })
    }

    pub fn is_logical(&self) -> bool {
        matches!(self.data, MatData::Bool(_))
    }

    /// 元素总数
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 行数（第一维），0 维数组视为 1 行
    pub fn rows(&self) -> usize {
        self.dims.first().copied().unwrap_or(1)
    }

    /// 转换为按行嵌套的 JSON 列表
    ///
    /// `[r, c]` 的矩阵得到 `r` 个长度为 `c` 的列表，
    /// 与 `scipy.io.loadmat(...)[key].tolist()` 的结构一致；
    /// 更高维数组每一维嵌套一层。
    pub fn to_json(&self) -> Result<Value, MatError> {
        let mut index = vec![0; self.dims.len()];
        self.nest(0, &mut index)
    }

    fn nest(&self, dim: usize, index: &mut [usize]) -> Result<Value, MatError> {
        if dim == self.dims.len() {
            return self.data.json_scalar(self.column_major_offset(index));
        }
        let mut items = Vec::with_capacity(self.dims[dim]);
        for i in 0..self.dims[dim] {
            index[dim] = i;
            items.push(self.nest(dim + 1, index)?);
        }
        Ok(Value::Array(items))
    }

    fn column_major_offset(&self, index: &[usize]) -> usize {
        let mut offset = 0;
        let mut stride = 1;
        for (&i, &d) in index.iter().zip(&self.dims) {
            offset += i * stride;
            stride *= d;
        }
        offset
    }

    /// 转换为行优先的 f32 矩阵，要求恰好 2 维
    pub fn to_matrix_f32(&self) -> Result<Array2<f32>, MatError> {
        if self.dims.len() != 2 {
            return Err(MatError::Shape(format!(
                "需要 2 维矩阵，实际维度为 {:?}",
                self.dims
            )));
        }
        let values: Vec<f32> = (0..self.len())
            .map(|i| self.data.get_f64(i).unwrap_or_default() as f32)
            .collect();
        let matrix = Array2::from_shape_vec((self.dims[0], self.dims[1]).f(), values)
            .map_err(|e| MatError::Shape(e.to_string()))?;
        Ok(matrix.as_standard_layout().into_owned())
    }
}
