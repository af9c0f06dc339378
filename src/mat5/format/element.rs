//! # Element Reading
//!
//! An element is a tag followed by its payload. Full-format payloads are
//! padded to the next 8-byte boundary; small data elements carry their
//! payload inside the tag and consume no further bytes.
//!
//! [`ElementReader`] owns the stream cursor and a scratch buffer. Payloads
//! read with [`Ownership::Borrowed`] alias that scratch buffer, so the borrow
//! checker keeps them from outliving the next read on the same reader.

use std::borrow::Cow;
use std::io::{self, Read};

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use log::trace;

use super::tag::{self, Tag};
use crate::mat5::types::array::ElementData;
use crate::mat5::types::error::{MatError, Result};
use crate::mat5::types::models::{DType, MAX_DIMS, MI_INT8, MI_INT32};
use crate::mat5::types::tables::{ScalarType, TypeTables};
use crate::mat5::utils::{Endian, padding_for};

/// Whether an element payload may alias the reader's scratch buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Payload borrows the scratch buffer until the next read.
    Borrowed,
    /// Payload is copied into its own allocation.
    Owned,
}

/// The decoded payload of one tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element<'a> {
    pub type_code: u32,
    pub byte_count: u32,
    pub data: Cow<'a, [u8]>,
}

/// Sequential, forward-only element reader over a byte stream.
#[derive(Debug)]
pub struct ElementReader<R> {
    stream: R,
    endian: Endian,
    scratch: Vec<u8>,
}

impl<R: Read> ElementReader<R> {
    pub fn new(stream: R, endian: Endian) -> Self {
        Self {
            stream,
            endian,
            scratch: Vec::new(),
        }
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn get_ref(&self) -> &R {
        &self.stream
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.stream
    }

    pub fn into_inner(self) -> R {
        self.stream
    }

    fn read_raw_tag(&mut self) -> Result<[u8; 8]> {
        let mut raw = [0u8; 8];
        self.stream.read_exact(&mut raw)?;
        Ok(raw)
    }

    /// Read a tag, detecting the small data element layout.
    pub fn read_tag(&mut self) -> Result<Tag> {
        let raw = self.read_raw_tag()?;
        tag::decode_tag(raw, self.endian.needs_swap())
    }

    /// Read a tag that cannot be a small data element.
    pub fn read_full_tag(&mut self) -> Result<Tag> {
        let raw = self.read_raw_tag()?;
        Ok(tag::decode_full_tag(raw, self.endian.needs_swap()))
    }

    /// Read two consecutive 32-bit words in stream order.
    pub fn read_words(&mut self) -> Result<(u32, u32)> {
        let raw = self.read_raw_tag()?;
        Ok(tag::decode_words(raw, self.endian.needs_swap()))
    }

    /// Advance the stream by `count` bytes.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        skip_bytes(&mut self.stream, count)
    }

    /// Read one element's payload, borrowed from scratch or owned per `ownership`.
    pub fn read_element(&mut self, ownership: Ownership) -> Result<Element<'_>> {
        let tag = self.read_tag()?;
        if let Some(inline) = tag.inline_bytes() {
            return Ok(Element {
                type_code: tag.type_code,
                byte_count: tag.byte_count,
                data: Cow::Owned(inline.to_vec()),
            });
        }

        let len = tag.byte_count as usize;
        let data = match ownership {
            Ownership::Borrowed => {
                read_payload(&mut self.stream, &mut self.scratch, len)?;
                Cow::Borrowed(self.scratch.as_slice())
            }
            Ownership::Owned => {
                let mut buf = Vec::new();
                read_payload(&mut self.stream, &mut buf, len)?;
                Cow::Owned(buf)
            }
        };
        trace!("Element type={} read {} bytes ({:?})", tag.type_code, len, ownership);
        Ok(Element {
            type_code: tag.type_code,
            byte_count: tag.byte_count,
            data,
        })
    }

    /// Read one element's payload directly into `dest`.
    ///
    /// Fails if the payload is larger than `dest`. Returns the tag so the
    /// caller knows the type code and how much of `dest` was filled.
    pub fn read_element_into(&mut self, dest: &mut [u8]) -> Result<Tag> {
        let tag = self.read_tag()?;
        self.read_payload_into(&tag, dest)?;
        Ok(tag)
    }

    fn read_payload_into(&mut self, tag: &Tag, dest: &mut [u8]) -> Result<()> {
        let len = tag.byte_count as usize;
        if len > dest.len() {
            return Err(MatError::InvalidFormat(format!(
                "Element of {} bytes does not fit a {}-byte destination",
                len,
                dest.len()
            )));
        }
        match tag.inline_bytes() {
            Some(inline) => dest[..len].copy_from_slice(inline),
            None => {
                self.stream.read_exact(&mut dest[..len])?;
                self.skip(padding_for(len))?;
            }
        }
        Ok(())
    }

    /// Read a numeric element and decode it with the stream's byte order.
    pub fn read_numeric_element(&mut self, tables: &TypeTables) -> Result<ElementData> {
        let endian = self.endian;
        let element = self.read_element(Ownership::Borrowed)?;
        let scalar = tables.scalar(element.type_code).ok_or_else(|| {
            MatError::InvalidFormat(format!(
                "Element type {} is not a numeric type",
                element.type_code
            ))
        })?;
        Ok(decode_scalars(&element.data, scalar, endian))
    }

    /// Read an `miINT8` element as raw bytes.
    pub fn read_int8_string(&mut self, context: &'static str) -> Result<Vec<u8>> {
        let element = self.read_element(Ownership::Owned)?;
        if element.type_code != MI_INT8 {
            return Err(MatError::TypeMismatch {
                context,
                expected: MI_INT8,
                found: element.type_code,
            });
        }
        Ok(element.data.into_owned())
    }

    /// Read an `miINT32` element into `dest`, returning how many values it held.
    pub fn read_int32s_into(&mut self, dest: &mut [i32], context: &'static str) -> Result<usize> {
        let tag = self.read_tag()?;
        if tag.type_code != MI_INT32 {
            return Err(MatError::TypeMismatch {
                context,
                expected: MI_INT32,
                found: tag.type_code,
            });
        }
        let byte_count = tag.byte_count as usize;
        if byte_count % 4 != 0 {
            return Err(MatError::InvalidFormat(format!(
                "{} element of {} bytes is not a whole number of int32 values",
                context, byte_count
            )));
        }
        let count = byte_count / 4;
        let capacity = dest.len().min(MAX_DIMS);
        if count > capacity {
            return Err(MatError::InvalidFormat(format!(
                "Too many values for {} (at most {}): element holds {}",
                context, capacity, count
            )));
        }

        let mut raw = [0u8; 4 * MAX_DIMS];
        self.read_payload_into(&tag, &mut raw[..byte_count])?;
        for (value, chunk) in dest.iter_mut().zip(raw[..count * 4].chunks_exact(4)) {
            *value = self.endian.read_i32(chunk);
        }
        Ok(count)
    }
}

/// Read exactly `len` payload bytes into `buf`, then skip the padding.
///
/// Reads through `take` so a corrupt byte count cannot force a huge allocation up front.
fn read_payload<R: Read>(stream: &mut R, buf: &mut Vec<u8>, len: usize) -> Result<()> {
    buf.clear();
    let got = stream.by_ref().take(len as u64).read_to_end(buf)?;
    if got < len {
        return Err(MatError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("Element payload truncated: expected {} bytes, got {}", len, got),
        )));
    }
    skip_bytes(stream, padding_for(len))
}

fn skip_bytes<R: Read>(stream: &mut R, count: usize) -> Result<()> {
    if count == 0 {
        return Ok(());
    }
    let skipped = io::copy(&mut stream.by_ref().take(count as u64), &mut io::sink())?;
    if skipped < count as u64 {
        return Err(MatError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("Expected to skip {} bytes, only {} available", count, skipped),
        )));
    }
    Ok(())
}

/// Decode `bytes` as scalars of `scalar`; a trailing partial scalar is ignored.
pub fn decode_scalars(bytes: &[u8], scalar: ScalarType, endian: Endian) -> ElementData {
    let count = bytes.len() / scalar.size;
    let bytes = &bytes[..count * scalar.size];

    macro_rules! read_into {
        ($t:ty, $method:ident, $variant:ident) => {{
            let mut out = vec![<$t>::default(); count];
            match endian {
                Endian::Little => LittleEndian::$method(bytes, &mut out),
                Endian::Big => BigEndian::$method(bytes, &mut out),
            }
            ElementData::$variant(out)
        }};
    }

    match scalar.dtype {
        DType::Int8 => ElementData::Int8(bytes.iter().map(|&b| b as i8).collect()),
        // No element type code decodes to bool; logical data is stored as uint8.
        DType::UInt8 | DType::Bool => ElementData::UInt8(bytes.to_vec()),
        DType::Int16 => read_into!(i16, read_i16_into, Int16),
        DType::UInt16 => read_into!(u16, read_u16_into, UInt16),
        DType::Int32 => read_into!(i32, read_i32_into, Int32),
        DType::UInt32 => read_into!(u32, read_u32_into, UInt32),
        DType::Int64 => read_into!(i64, read_i64_into, Int64),
        DType::UInt64 => read_into!(u64, read_u64_into, UInt64),
        DType::Float32 => read_into!(f32, read_f32_into, Float32),
        DType::Float64 => read_into!(f64, read_f64_into, Float64),
    }
}
