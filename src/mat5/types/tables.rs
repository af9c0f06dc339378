//! Lookup tables built once per reader: element type codes to scalar types,
//! array classes to dtypes, and char element type codes to text codecs.

use std::collections::HashMap;

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use log::trace;

use super::error::{MatError, Result};
use super::models::*;
use crate::mat5::utils::Endian;

/// Size and dtype of the scalar behind a numeric element type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalarType {
    pub size: usize,
    pub dtype: DType,
}

/// How the bytes of a char element become text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCodec {
    Ascii,
    Encoding(&'static Encoding),
    Utf32(Endian),
}

impl TextCodec {
    pub fn name(&self) -> &'static str {
        match self {
            TextCodec::Ascii => "ascii",
            TextCodec::Encoding(encoding) => encoding.name(),
            TextCodec::Utf32(Endian::Little) => "UTF-32LE",
            TextCodec::Utf32(Endian::Big) => "UTF-32BE",
        }
    }
}

/// Codec for `miUINT16` char data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uint16Codec {
    pub codec: TextCodec,
    /// Keep only the low byte of each 16-bit unit before decoding.
    pub low_byte_only: bool,
}

impl Uint16Codec {
    /// Resolve the configured encoding for a file of the given byte order.
    ///
    /// `None` selects UTF-16 in the file's byte order. Encodings that write an
    /// ASCII character in one byte decode the low byte of each unit only.
    pub fn resolve(encoding: Option<&'static Encoding>, endian: Endian) -> Self {
        match encoding {
            None => Self {
                codec: TextCodec::Encoding(utf16_for(endian)),
                low_byte_only: false,
            },
            Some(encoding) if encoding == UTF_16LE || encoding == UTF_16BE => Self {
                codec: TextCodec::Encoding(encoding),
                low_byte_only: false,
            },
            Some(encoding) => Self {
                codec: TextCodec::Encoding(encoding),
                low_byte_only: encoding.is_ascii_compatible(),
            },
        }
    }
}

fn utf16_for(endian: Endian) -> &'static Encoding {
    match endian {
        Endian::Little => UTF_16LE,
        Endian::Big => UTF_16BE,
    }
}

/// Type and class lookup tables for one stream.
#[derive(Debug, Clone)]
pub struct TypeTables {
    endian: Endian,
    scalars: HashMap<u32, ScalarType>,
    class_dtypes: HashMap<MatClass, DType>,
    codecs: HashMap<u32, Option<TextCodec>>,
    uint16: Uint16Codec,
}

impl TypeTables {
    pub fn new(endian: Endian, uint16_encoding: Option<&'static Encoding>) -> Self {
        let scalars = [
            (MI_INT8, 1, DType::Int8),
            (MI_UINT8, 1, DType::UInt8),
            (MI_INT16, 2, DType::Int16),
            (MI_UINT16, 2, DType::UInt16),
            (MI_INT32, 4, DType::Int32),
            (MI_UINT32, 4, DType::UInt32),
            (MI_SINGLE, 4, DType::Float32),
            (MI_DOUBLE, 8, DType::Float64),
            (MI_INT64, 8, DType::Int64),
            (MI_UINT64, 8, DType::UInt64),
        ]
        .into_iter()
        .map(|(code, size, dtype)| (code, ScalarType { size, dtype }))
        .collect();

        let class_dtypes = [
            (MatClass::Double, DType::Float64),
            (MatClass::Single, DType::Float32),
            (MatClass::Int8, DType::Int8),
            (MatClass::UInt8, DType::UInt8),
            (MatClass::Int16, DType::Int16),
            (MatClass::UInt16, DType::UInt16),
            (MatClass::Int32, DType::Int32),
            (MatClass::UInt32, DType::UInt32),
            (MatClass::Int64, DType::Int64),
            (MatClass::UInt64, DType::UInt64),
        ]
        .into_iter()
        .collect();

        let codecs = [
            (MI_UTF8, Some(TextCodec::Encoding(UTF_8))),
            (MI_UTF16, Some(TextCodec::Encoding(utf16_for(endian)))),
            (MI_UTF32, Some(TextCodec::Utf32(endian))),
        ]
        .into_iter()
        .collect();

        let uint16 = Uint16Codec::resolve(uint16_encoding, endian);
        trace!(
            "Type tables for {} stream: uint16 codec={}, low_byte_only={}",
            endian,
            uint16.codec.name(),
            uint16.low_byte_only
        );

        Self {
            endian,
            scalars,
            class_dtypes,
            codecs,
            uint16,
        }
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn scalar(&self, type_code: u32) -> Option<ScalarType> {
        self.scalars.get(&type_code).copied()
    }

    /// Native dtype of a numeric class.
    pub fn class_dtype(&self, class: MatClass) -> Option<DType> {
        self.class_dtypes.get(&class).copied()
    }

    pub fn uint16_codec(&self) -> Uint16Codec {
        self.uint16
    }

    /// Codec registered for a UTF element type code.
    pub fn codec(&self, type_code: u32) -> Result<TextCodec> {
        self.codecs
            .get(&type_code)
            .copied()
            .flatten()
            .ok_or(MatError::UnsupportedEncoding(type_code))
    }

    /// Register, replace or (with `None`) disable the codec for a type code.
    pub fn set_codec(&mut self, type_code: u32, codec: Option<TextCodec>) {
        self.codecs.insert(type_code, codec);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::WINDOWS_1252;

    #[test]
    fn scalar_sizes_match_type_codes() {
        let tables = TypeTables::new(Endian::Little, None);
        assert_eq!(tables.scalar(MI_DOUBLE).unwrap().size, 8);
        assert_eq!(tables.scalar(MI_UINT16).unwrap().dtype, DType::UInt16);
        assert!(tables.scalar(MI_MATRIX).is_none());
        assert_eq!(tables.class_dtype(MatClass::Single), Some(DType::Float32));
        assert_eq!(tables.class_dtype(MatClass::Cell), None);
    }

    #[test]
    fn utf_codecs_follow_byte_order() {
        let tables = TypeTables::new(Endian::Big, None);
        assert_eq!(tables.codec(MI_UTF16).unwrap(), TextCodec::Encoding(UTF_16BE));
        assert_eq!(tables.codec(MI_UTF32).unwrap(), TextCodec::Utf32(Endian::Big));
        assert_eq!(tables.uint16_codec().codec, TextCodec::Encoding(UTF_16BE));
        assert!(!tables.uint16_codec().low_byte_only);
    }

    #[test]
    fn disabled_or_missing_codec_is_unsupported() {
        let mut tables = TypeTables::new(Endian::Little, None);
        tables.set_codec(MI_UTF32, None);
        assert!(matches!(tables.codec(MI_UTF32), Err(MatError::UnsupportedEncoding(18))));
        assert!(matches!(tables.codec(MI_DOUBLE), Err(MatError::UnsupportedEncoding(9))));
    }

    #[test]
    fn single_byte_uint16_codec_keeps_low_bytes() {
        let codec = Uint16Codec::resolve(Some(WINDOWS_1252), Endian::Little);
        assert!(codec.low_byte_only);
        let codec = Uint16Codec::resolve(Some(UTF_16LE), Endian::Big);
        assert!(!codec.low_byte_only);
    }
}
