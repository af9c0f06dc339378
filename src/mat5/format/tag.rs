//! Element tag decoding.
//!
//! # Tag Structure
//! ```text
//! Full format:  [type_code: u32][byte_count: u32]            payload follows, padded to 8
//! SDE format:   [byte_count: u16 | type_code: u16][payload: 4 bytes]
//! ```
//!
//! Both words are in the file's byte order. The two layouts are told apart by
//! the high 16 bits of the first word: nonzero means small data element.

use log::trace;

use crate::mat5::types::error::{MatError, Result};
use crate::mat5::utils::byteswap_u32;

/// Largest payload a small data element can carry inline.
pub const SDE_MAX_BYTES: u32 = 4;

/// A decoded element tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    pub type_code: u32,
    /// Payload length in bytes, excluding padding.
    pub byte_count: u32,
    /// Inline payload of a small data element; only the first `byte_count` bytes are meaningful.
    pub inline: Option<[u8; 4]>,
}

impl Tag {
    pub fn is_small(&self) -> bool {
        self.inline.is_some()
    }

    /// The inline payload, truncated to `byte_count`.
    pub fn inline_bytes(&self) -> Option<&[u8]> {
        self.inline
            .as_ref()
            .map(|bytes| &bytes[..self.byte_count as usize])
    }
}

/// Split 8 raw bytes into two words, swapping them when the stream order is not native.
pub fn decode_words(raw: [u8; 8], swap: bool) -> (u32, u32) {
    let first = u32::from_ne_bytes([raw[0], raw[1], raw[2], raw[3]]);
    let second = u32::from_ne_bytes([raw[4], raw[5], raw[6], raw[7]]);
    if swap {
        (byteswap_u32(first), byteswap_u32(second))
    } else {
        (first, second)
    }
}

/// Decode a tag that may use the small data element layout.
pub fn decode_tag(raw: [u8; 8], swap: bool) -> Result<Tag> {
    let (first, second) = decode_words(raw, swap);
    let small_count = first >> 16;
    if small_count != 0 {
        if small_count > SDE_MAX_BYTES {
            return Err(MatError::InvalidFormat(format!(
                "SDE byte count exceeds 4: {}",
                small_count
            )));
        }
        let tag = Tag {
            type_code: first & 0xFFFF,
            byte_count: small_count,
            inline: Some([raw[4], raw[5], raw[6], raw[7]]),
        };
        trace!("SDE tag: type={}, bytes={}", tag.type_code, tag.byte_count);
        return Ok(tag);
    }
    trace!("Full tag: type={}, bytes={}", first, second);
    Ok(Tag {
        type_code: first,
        byte_count: second,
        inline: None,
    })
}

/// Decode a tag known to be in full format, such as a matrix tag.
pub fn decode_full_tag(raw: [u8; 8], swap: bool) -> Tag {
    let (type_code, byte_count) = decode_words(raw, swap);
    Tag {
        type_code,
        byte_count,
        inline: None,
    }
}
