//! Core data structures for MAT5 format components.
//!
//! This module defines the fundamental types used throughout the library:
//! - Element type codes and array class codes
//! - Scalar dtypes
//! - Array headers and decoded variables

use super::array::MatArray;
use super::error::{MatError, Result};

pub const MI_INT8: u32 = 1;
pub const MI_UINT8: u32 = 2;
pub const MI_INT16: u32 = 3;
pub const MI_UINT16: u32 = 4;
pub const MI_INT32: u32 = 5;
pub const MI_UINT32: u32 = 6;
pub const MI_SINGLE: u32 = 7;
pub const MI_DOUBLE: u32 = 9;
pub const MI_INT64: u32 = 12;
pub const MI_UINT64: u32 = 13;
pub const MI_MATRIX: u32 = 14;
pub const MI_COMPRESSED: u32 = 15;
pub const MI_UTF8: u32 = 16;
pub const MI_UTF16: u32 = 17;
pub const MI_UTF32: u32 = 18;

/// Largest rank MATLAB (and this reader) accepts for an array.
pub const MAX_DIMS: usize = 32;

/// MATLAB array classes, as stored in the low byte of the array flags word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatClass {
    Cell = 1,
    Struct = 2,
    Object = 3,
    Char = 4,
    Sparse = 5,
    Double = 6,
    Single = 7,
    Int8 = 8,
    UInt8 = 9,
    Int16 = 10,
    UInt16 = 11,
    Int32 = 12,
    UInt32 = 13,
    Int64 = 14,
    UInt64 = 15,
    Function = 16,
    Opaque = 17,
}

impl MatClass {
    /// MATLAB's own name for the class, as printed by `whos`.
    pub fn name(&self) -> &'static str {
        match self {
            MatClass::Cell => "cell",
            MatClass::Struct => "struct",
            MatClass::Object => "object",
            MatClass::Char => "char",
            MatClass::Sparse => "sparse",
            MatClass::Double => "double",
            MatClass::Single => "single",
            MatClass::Int8 => "int8",
            MatClass::UInt8 => "uint8",
            MatClass::Int16 => "int16",
            MatClass::UInt16 => "uint16",
            MatClass::Int32 => "int32",
            MatClass::UInt32 => "uint32",
            MatClass::Int64 => "int64",
            MatClass::UInt64 => "uint64",
            MatClass::Function => "function_handle",
            MatClass::Opaque => "opaque",
        }
    }
}

impl TryFrom<u8> for MatClass {
    type Error = MatError;
    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Self::Cell),
            2 => Ok(Self::Struct),
            3 => Ok(Self::Object),
            4 => Ok(Self::Char),
            5 => Ok(Self::Sparse),
            6 => Ok(Self::Double),
            7 => Ok(Self::Single),
            8 => Ok(Self::Int8),
            9 => Ok(Self::UInt8),
            10 => Ok(Self::Int16),
            11 => Ok(Self::UInt16),
            12 => Ok(Self::Int32),
            13 => Ok(Self::UInt32),
            14 => Ok(Self::Int64),
            15 => Ok(Self::UInt64),
            16 => Ok(Self::Function),
            17 => Ok(Self::Opaque),
            _ => Err(MatError::UnsupportedClass(value)),
        }
    }
}

impl std::fmt::Display for MatClass {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Scalar element types of decoded numeric data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Bool,
    Float64,
    Float32,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
}

impl std::fmt::Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            DType::Bool => "bool",
            DType::Float64 => "float64",
            DType::Float32 => "float32",
            DType::Int8 => "int8",
            DType::UInt8 => "uint8",
            DType::Int16 => "int16",
            DType::UInt16 => "uint16",
            DType::Int32 => "int32",
            DType::UInt32 => "uint32",
            DType::Int64 => "int64",
            DType::UInt64 => "uint64",
        };
        write!(f, "{}", name)
    }
}

/// Flag bits of the array flags word.
const FLAG_LOGICAL: u32 = 1 << 9;
const FLAG_GLOBAL: u32 = 1 << 10;
const FLAG_COMPLEX: u32 = 1 << 11;

/// Header decoded once per variable or nested matrix.
///
/// Drives every class-specific reader: the class selects the reader and the
/// product of `dims` is the element count it reconstructs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayHeader {
    /// Raw name bytes; empty for nested matrices.
    pub name: Vec<u8>,
    /// Raw class code (low byte of the flags word).
    pub class_code: u8,
    pub dims: Vec<i32>,
    pub is_complex: bool,
    pub is_logical: bool,
    pub is_global: bool,
    /// Upper bound on stored nonzeros for sparse arrays.
    pub nzmax: u32,
}

impl ArrayHeader {
    /// Decode the class code and flag bits from the flags word.
    pub fn from_flags(flags: u32, nzmax: u32, dims: Vec<i32>, name: Vec<u8>) -> Self {
        Self {
            name,
            class_code: (flags & 0xFF) as u8,
            dims,
            is_complex: flags & FLAG_COMPLEX != 0,
            is_logical: flags & FLAG_LOGICAL != 0,
            is_global: flags & FLAG_GLOBAL != 0,
            nzmax,
        }
    }

    pub fn class(&self) -> Result<MatClass> {
        MatClass::try_from(self.class_code)
    }

    /// The name as text. MATLAB names are ASCII; anything else is replaced lossily.
    pub fn name_str(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }
}

/// A named top-level variable together with its decoded array.
#[derive(Debug, Clone, PartialEq)]
pub struct MatVariable {
    pub name: String,
    /// `None` for the `[]` shortcut, which carries no header.
    pub header: Option<ArrayHeader>,
    pub array: MatArray,
}

/// Summary of a top-level variable, as returned by `MatFile::list_variables`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableInfo {
    pub name: String,
    pub class_code: u8,
    pub dims: Vec<i32>,
    pub is_complex: bool,
    pub is_global: bool,
}

impl VariableInfo {
    pub fn class_name(&self) -> &'static str {
        MatClass::try_from(self.class_code)
            .map(|c| c.name())
            .unwrap_or("unknown")
    }
}

impl From<&ArrayHeader> for VariableInfo {
    fn from(header: &ArrayHeader) -> Self {
        Self {
            name: header.name_str(),
            class_code: header.class_code,
            dims: header.dims.clone(),
            is_complex: header.is_complex,
            is_global: header.is_global,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_word_bits_decode() {
        let flags = 6 | FLAG_COMPLEX | FLAG_GLOBAL;
        let header = ArrayHeader::from_flags(flags, 0, vec![1, 1], b"x".to_vec());
        assert_eq!(header.class().unwrap(), MatClass::Double);
        assert!(header.is_complex);
        assert!(header.is_global);
        assert!(!header.is_logical);

        let logical = ArrayHeader::from_flags(9 | FLAG_LOGICAL, 0, vec![1, 1], Vec::new());
        assert!(logical.is_logical);
        assert_eq!(logical.class().unwrap(), MatClass::UInt8);
    }

    #[test]
    fn unknown_class_code_is_unsupported() {
        assert!(matches!(MatClass::try_from(42), Err(MatError::UnsupportedClass(42))));
    }
}
