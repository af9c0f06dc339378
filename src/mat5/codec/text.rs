//! Text decoding for char arrays.
//!
//! MAT5 char data arrives as:
//! - `miINT8` / `miUINT8`: ASCII
//! - `miUINT16`: UTF-16 code units, or single-byte text widened to 16 bits
//! - `miUTF8` / `miUTF16` / `miUTF32`: the named Unicode encoding

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use log::trace;

use crate::mat5::types::error::{MatError, Result};
use crate::mat5::types::tables::{TextCodec, Uint16Codec};
use crate::mat5::utils::Endian;

/// Decode `bytes` with `codec`, rejecting malformed input.
pub fn decode(bytes: &[u8], codec: TextCodec) -> Result<String> {
    trace!("Decoding {} bytes of char data as {}", bytes.len(), codec.name());
    match codec {
        TextCodec::Ascii => {
            if let Some(pos) = bytes.iter().position(|b| !b.is_ascii()) {
                return Err(MatError::TextDecode(format!(
                    "Byte {:#04x} at offset {} is not ASCII",
                    bytes[pos], pos
                )));
            }
            Ok(bytes.iter().map(|&b| b as char).collect())
        }
        TextCodec::Encoding(encoding) => encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned())
            .ok_or_else(|| MatError::TextDecode(format!("Malformed {} data", encoding.name()))),
        TextCodec::Utf32(endian) => decode_utf32(bytes, endian),
    }
}

/// Decode `miUINT16` char data.
pub fn decode_uint16(bytes: &[u8], codec: Uint16Codec, endian: Endian) -> Result<String> {
    if !codec.low_byte_only {
        return decode(bytes, codec.codec);
    }
    let low_bytes: Vec<u8> = bytes
        .chunks_exact(2)
        .map(|unit| endian.read_u16(unit) as u8)
        .collect();
    decode(&low_bytes, codec.codec)
}

fn decode_utf32(bytes: &[u8], endian: Endian) -> Result<String> {
    if bytes.len() % 4 != 0 {
        return Err(MatError::TextDecode(format!(
            "UTF-32 data length {} is not a multiple of 4",
            bytes.len()
        )));
    }
    bytes
        .chunks_exact(4)
        .map(|unit| {
            let scalar = match endian {
                Endian::Little => LittleEndian::read_u32(unit),
                Endian::Big => BigEndian::read_u32(unit),
            };
            char::from_u32(scalar)
                .ok_or_else(|| MatError::TextDecode(format!("Invalid UTF-32 scalar {:#x}", scalar)))
        })
        .collect()
}
