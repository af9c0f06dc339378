//! Decoded MATLAB arrays.
//!
//! Every array is indexed with MATLAB subscripts (`a[[row, col]]`) and keeps
//! the column-major strides of the on-disk data.

use ndarray::ArrayD;
use num_complex::{Complex32, Complex64};

use super::error::{MatError, Result};
use super::models::DType;
use crate::mat5::utils::fortran_array;

/// Flat payload of one numeric element, in the scalar type of its type code.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementData {
    Int8(Vec<i8>),
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
    Int64(Vec<i64>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

/// Match every `ElementData` variant, binding the vector to `$v`.
macro_rules! with_element {
    ($data:expr, $v:ident => $body:expr) => {
        match $data {
            ElementData::Int8($v) => $body,
            ElementData::UInt8($v) => $body,
            ElementData::Int16($v) => $body,
            ElementData::UInt16($v) => $body,
            ElementData::Int32($v) => $body,
            ElementData::UInt32($v) => $body,
            ElementData::Int64($v) => $body,
            ElementData::UInt64($v) => $body,
            ElementData::Float32($v) => $body,
            ElementData::Float64($v) => $body,
        }
    };
}

impl ElementData {
    pub fn len(&self) -> usize {
        with_element!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> DType {
        match self {
            ElementData::Int8(_) => DType::Int8,
            ElementData::UInt8(_) => DType::UInt8,
            ElementData::Int16(_) => DType::Int16,
            ElementData::UInt16(_) => DType::UInt16,
            ElementData::Int32(_) => DType::Int32,
            ElementData::UInt32(_) => DType::UInt32,
            ElementData::Int64(_) => DType::Int64,
            ElementData::UInt64(_) => DType::UInt64,
            ElementData::Float32(_) => DType::Float32,
            ElementData::Float64(_) => DType::Float64,
        }
    }

    pub fn to_f64(&self) -> Vec<f64> {
        with_element!(self, v => v.iter().map(|&x| x as f64).collect())
    }

    /// Convert to indices, failing on negative or fractional values.
    pub fn to_indices(&self, context: &str) -> Result<Vec<usize>> {
        let values = self.to_f64();
        values
            .into_iter()
            .map(|x| {
                if x >= 0.0 && x.fract() == 0.0 {
                    Ok(x as usize)
                } else {
                    Err(MatError::InvalidFormat(format!("Invalid {} value {}", context, x)))
                }
            })
            .collect()
    }

    /// Keep only the first `len` values.
    pub fn truncate(&mut self, len: usize) {
        with_element!(self, v => v.truncate(len))
    }

    /// Shape the flat, column-major values into an array of `shape`.
    pub fn into_numeric(self, shape: &[usize]) -> Result<NumericData> {
        Ok(match self {
            ElementData::Int8(v) => NumericData::Int8(fortran_array(v, shape)?),
            ElementData::UInt8(v) => NumericData::UInt8(fortran_array(v, shape)?),
            ElementData::Int16(v) => NumericData::Int16(fortran_array(v, shape)?),
            ElementData::UInt16(v) => NumericData::UInt16(fortran_array(v, shape)?),
            ElementData::Int32(v) => NumericData::Int32(fortran_array(v, shape)?),
            ElementData::UInt32(v) => NumericData::UInt32(fortran_array(v, shape)?),
            ElementData::Int64(v) => NumericData::Int64(fortran_array(v, shape)?),
            ElementData::UInt64(v) => NumericData::UInt64(fortran_array(v, shape)?),
            ElementData::Float32(v) => NumericData::Float32(fortran_array(v, shape)?),
            ElementData::Float64(v) => NumericData::Float64(fortran_array(v, shape)?),
        })
    }

    /// Pair real and imaginary parts into one complex array.
    ///
    /// Two single-precision parts give `Complex32`; every other pairing widens to `Complex64`.
    pub fn into_complex(real: ElementData, imag: ElementData, shape: &[usize]) -> Result<NumericData> {
        if real.len() != imag.len() {
            return Err(MatError::InvalidFormat(format!(
                "Complex parts differ in length: {} real, {} imaginary",
                real.len(),
                imag.len()
            )));
        }
        match (real, imag) {
            (ElementData::Float32(re), ElementData::Float32(im)) => {
                let values = re.into_iter().zip(im).map(|(r, i)| Complex32::new(r, i)).collect();
                Ok(NumericData::ComplexSingle(fortran_array(values, shape)?))
            }
            (re, im) => {
                let values = re
                    .to_f64()
                    .into_iter()
                    .zip(im.to_f64())
                    .map(|(r, i)| Complex64::new(r, i))
                    .collect();
                Ok(NumericData::ComplexDouble(fortran_array(values, shape)?))
            }
        }
    }
}

/// Numeric array contents, one variant per scalar type.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericData {
    Bool(ArrayD<bool>),
    Float64(ArrayD<f64>),
    Float32(ArrayD<f32>),
    Int8(ArrayD<i8>),
    UInt8(ArrayD<u8>),
    Int16(ArrayD<i16>),
    UInt16(ArrayD<u16>),
    Int32(ArrayD<i32>),
    UInt32(ArrayD<u32>),
    Int64(ArrayD<i64>),
    UInt64(ArrayD<u64>),
    ComplexSingle(ArrayD<Complex32>),
    ComplexDouble(ArrayD<Complex64>),
}

/// Apply `$body` to the array in every `NumericData` variant, keeping the variant.
macro_rules! map_numeric {
    ($data:expr, $a:ident => $body:expr) => {
        match $data {
            NumericData::Bool($a) => NumericData::Bool($body),
            NumericData::Float64($a) => NumericData::Float64($body),
            NumericData::Float32($a) => NumericData::Float32($body),
            NumericData::Int8($a) => NumericData::Int8($body),
            NumericData::UInt8($a) => NumericData::UInt8($body),
            NumericData::Int16($a) => NumericData::Int16($body),
            NumericData::UInt16($a) => NumericData::UInt16($body),
            NumericData::Int32($a) => NumericData::Int32($body),
            NumericData::UInt32($a) => NumericData::UInt32($body),
            NumericData::Int64($a) => NumericData::Int64($body),
            NumericData::UInt64($a) => NumericData::UInt64($body),
            NumericData::ComplexSingle($a) => NumericData::ComplexSingle($body),
            NumericData::ComplexDouble($a) => NumericData::ComplexDouble($body),
        }
    };
}
pub(crate) use map_numeric;

/// Evaluate `$body` against the array in every `NumericData` variant.
macro_rules! with_numeric {
    ($data:expr, $a:ident => $body:expr) => {
        match $data {
            NumericData::Bool($a) => $body,
            NumericData::Float64($a) => $body,
            NumericData::Float32($a) => $body,
            NumericData::Int8($a) => $body,
            NumericData::UInt8($a) => $body,
            NumericData::Int16($a) => $body,
            NumericData::UInt16($a) => $body,
            NumericData::Int32($a) => $body,
            NumericData::UInt32($a) => $body,
            NumericData::Int64($a) => $body,
            NumericData::UInt64($a) => $body,
            NumericData::ComplexSingle($a) => $body,
            NumericData::ComplexDouble($a) => $body,
        }
    };
}

/// Convert a real-valued array into the variant for `dtype`.
macro_rules! cast_real {
    ($a:expr, $dtype:expr) => {
        match $dtype {
            DType::Bool => NumericData::Bool($a.mapv(|x| x as f64 != 0.0)),
            DType::Float64 => NumericData::Float64($a.mapv(|x| x as f64)),
            DType::Float32 => NumericData::Float32($a.mapv(|x| x as f32)),
            DType::Int8 => NumericData::Int8($a.mapv(|x| x as i8)),
            DType::UInt8 => NumericData::UInt8($a.mapv(|x| x as u8)),
            DType::Int16 => NumericData::Int16($a.mapv(|x| x as i16)),
            DType::UInt16 => NumericData::UInt16($a.mapv(|x| x as u16)),
            DType::Int32 => NumericData::Int32($a.mapv(|x| x as i32)),
            DType::UInt32 => NumericData::UInt32($a.mapv(|x| x as u32)),
            DType::Int64 => NumericData::Int64($a.mapv(|x| x as i64)),
            DType::UInt64 => NumericData::UInt64($a.mapv(|x| x as u64)),
        }
    };
}

impl NumericData {
    pub fn shape(&self) -> &[usize] {
        with_numeric!(self, a => a.shape())
    }

    pub fn len(&self) -> usize {
        with_numeric!(self, a => a.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, NumericData::ComplexSingle(_) | NumericData::ComplexDouble(_))
    }

    /// Real dtype of the data; `None` for complex arrays.
    pub fn dtype(&self) -> Option<DType> {
        Some(match self {
            NumericData::Bool(_) => DType::Bool,
            NumericData::Float64(_) => DType::Float64,
            NumericData::Float32(_) => DType::Float32,
            NumericData::Int8(_) => DType::Int8,
            NumericData::UInt8(_) => DType::UInt8,
            NumericData::Int16(_) => DType::Int16,
            NumericData::UInt16(_) => DType::UInt16,
            NumericData::Int32(_) => DType::Int32,
            NumericData::UInt32(_) => DType::UInt32,
            NumericData::Int64(_) => DType::Int64,
            NumericData::UInt64(_) => DType::UInt64,
            NumericData::ComplexSingle(_) | NumericData::ComplexDouble(_) => return None,
        })
    }

    /// Recast real data to `dtype`. Complex data is returned unchanged.
    pub fn cast(self, dtype: DType) -> NumericData {
        if self.dtype() == Some(dtype) {
            return self;
        }
        match self {
            NumericData::Bool(a) => cast_real!(a.mapv(u8::from), dtype),
            NumericData::Float64(a) => cast_real!(a, dtype),
            NumericData::Float32(a) => cast_real!(a, dtype),
            NumericData::Int8(a) => cast_real!(a, dtype),
            NumericData::UInt8(a) => cast_real!(a, dtype),
            NumericData::Int16(a) => cast_real!(a, dtype),
            NumericData::UInt16(a) => cast_real!(a, dtype),
            NumericData::Int32(a) => cast_real!(a, dtype),
            NumericData::UInt32(a) => cast_real!(a, dtype),
            NumericData::Int64(a) => cast_real!(a, dtype),
            NumericData::UInt64(a) => cast_real!(a, dtype),
            complex @ (NumericData::ComplexSingle(_) | NumericData::ComplexDouble(_)) => complex,
        }
    }

    /// View as `f64` if the data is stored as doubles.
    pub fn as_f64(&self) -> Option<&ArrayD<f64>> {
        match self {
            NumericData::Float64(a) => Some(a),
            _ => None,
        }
    }
}

/// Values of a sparse array.
#[derive(Debug, Clone, PartialEq)]
pub enum SparseValues {
    Real(Vec<f64>),
    Logical(Vec<bool>),
    Complex(Vec<Complex64>),
}

impl SparseValues {
    pub fn len(&self) -> usize {
        match self {
            SparseValues::Real(v) => v.len(),
            SparseValues::Logical(v) => v.len(),
            SparseValues::Complex(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A sparse matrix in compressed-sparse-column layout.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseArray {
    pub rows: usize,
    pub cols: usize,
    /// Column pointers, `cols + 1` entries; column `j` spans `indptr[j]..indptr[j + 1]`.
    pub indptr: Vec<usize>,
    /// Row index of each stored value.
    pub indices: Vec<usize>,
    pub values: SparseValues,
}

impl SparseArray {
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Position in `values` of the entry at `(row, col)`, if one is stored.
    pub fn position(&self, row: usize, col: usize) -> Option<usize> {
        if col >= self.cols {
            return None;
        }
        let (start, end) = (self.indptr[col], self.indptr[col + 1]);
        self.indices[start..end]
            .iter()
            .position(|&r| r == row)
            .map(|offset| start + offset)
    }

    /// Real value at `(row, col)`; zero when nothing is stored there.
    pub fn get_f64(&self, row: usize, col: usize) -> Option<f64> {
        match &self.values {
            SparseValues::Real(v) => Some(self.position(row, col).map_or(0.0, |p| v[p])),
            _ => None,
        }
    }
}

/// Character data.
#[derive(Debug, Clone, PartialEq)]
pub enum CharArray {
    /// One `char` per MATLAB character, shaped like the MATLAB array.
    Chars(ArrayD<char>),
    /// Rows joined along the last axis, produced by `chars_as_strings`.
    Strings(ArrayD<String>),
}

impl CharArray {
    pub fn shape(&self) -> &[usize] {
        match self {
            CharArray::Chars(a) => a.shape(),
            CharArray::Strings(a) => a.shape(),
        }
    }

    /// All characters in MATLAB (column-major) order.
    pub fn to_text(&self) -> String {
        match self {
            CharArray::Chars(a) => a.t().iter().collect(),
            CharArray::Strings(a) => a.t().iter().map(String::as_str).collect(),
        }
    }
}

/// One struct instance in record layout: values aligned with `StructArray::field_names`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record(pub Vec<MatArray>);

/// One struct instance in map layout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatStruct {
    fields: Vec<(String, MatArray)>,
}

impl MatStruct {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: String, value: MatArray) {
        self.fields.push((name, value));
    }

    pub fn get(&self, name: &str) -> Option<&MatArray> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MatArray)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Storage of a struct array, selected by `StructMode`.
#[derive(Debug, Clone, PartialEq)]
pub enum StructLayout {
    Record(ArrayD<Record>),
    Map(ArrayD<MatStruct>),
    /// Record mode with no field names: instances carry nothing.
    Empty(ArrayD<()>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructArray {
    pub field_names: Vec<String>,
    pub layout: StructLayout,
}

impl StructArray {
    pub fn shape(&self) -> &[usize] {
        match &self.layout {
            StructLayout::Record(a) => a.shape(),
            StructLayout::Map(a) => a.shape(),
            StructLayout::Empty(a) => a.shape(),
        }
    }

    pub fn len(&self) -> usize {
        self.shape().iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Field `name` of the instance at MATLAB subscript `index`.
    pub fn get(&self, index: &[usize], name: &str) -> Option<&MatArray> {
        match &self.layout {
            StructLayout::Record(a) => {
                let position = self.field_names.iter().position(|n| n == name)?;
                a.get(index)?.0.get(position)
            }
            StructLayout::Map(a) => a.get(index)?.get(name),
            StructLayout::Empty(_) => None,
        }
    }
}

/// A MATLAB object: struct data tagged with its class name.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectArray {
    pub class_name: String,
    pub fields: StructArray,
}

/// Any decoded MATLAB array.
#[derive(Debug, Clone, PartialEq)]
pub enum MatArray {
    Numeric(NumericData),
    Sparse(SparseArray),
    Char(CharArray),
    Cell(ArrayD<MatArray>),
    Struct(StructArray),
    Object(ObjectArray),
}

impl MatArray {
    pub fn shape(&self) -> Vec<usize> {
        match self {
            MatArray::Numeric(n) => n.shape().to_vec(),
            MatArray::Sparse(s) => vec![s.rows, s.cols],
            MatArray::Char(c) => c.shape().to_vec(),
            MatArray::Cell(c) => c.shape().to_vec(),
            MatArray::Struct(s) => s.shape().to_vec(),
            MatArray::Object(o) => o.fields.shape().to_vec(),
        }
    }

    /// Short description of the array kind, used in listings.
    pub fn kind(&self) -> String {
        match self {
            MatArray::Numeric(n) => match n.dtype() {
                Some(dtype) => dtype.to_string(),
                None if matches!(n, NumericData::ComplexSingle(_)) => "complex64".to_string(),
                None => "complex128".to_string(),
            },
            MatArray::Sparse(_) => "sparse".to_string(),
            MatArray::Char(_) => "char".to_string(),
            MatArray::Cell(_) => "cell".to_string(),
            MatArray::Struct(_) => "struct".to_string(),
            MatArray::Object(o) => format!("object ({})", o.class_name),
        }
    }

    pub fn as_numeric(&self) -> Option<&NumericData> {
        match self {
            MatArray::Numeric(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_sparse(&self) -> Option<&SparseArray> {
        match self {
            MatArray::Sparse(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<&CharArray> {
        match self {
            MatArray::Char(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_cell(&self) -> Option<&ArrayD<MatArray>> {
        match self {
            MatArray::Cell(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructArray> {
        match self {
            MatArray::Struct(s) => Some(s),
            MatArray::Object(o) => Some(&o.fields),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectArray> {
        match self {
            MatArray::Object(o) => Some(o),
            _ => None,
        }
    }
}
