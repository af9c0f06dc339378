//! Array header parsing.
//!
//! # Header Structure
//! ```text
//! [tag: 8 bytes]            miUINT32, 8 bytes (discarded)
//! [flags: u32][nzmax: u32]  class code in the low byte, flag bits 9-11
//! [miINT32 element]         dimensions, at most 32
//! [miINT8 element]          array name, empty for nested matrices
//! ```

use std::io::Read;

use log::trace;

use super::element::ElementReader;
use crate::mat5::types::error::Result;
use crate::mat5::types::models::{ArrayHeader, MAX_DIMS};

/// Read the header that opens every matrix body.
pub fn read_header<R: Read>(elements: &mut ElementReader<R>) -> Result<ArrayHeader> {
    // Step 1: The flags sub-element tag carries nothing we use
    elements.skip(8)?;

    // Step 2: Flags word and nzmax
    let (flags, nzmax) = elements.read_words()?;

    // Step 3: Dimensions into a fixed stack buffer
    let mut dims = [0i32; MAX_DIMS];
    let rank = elements.read_int32s_into(&mut dims, "dimensions")?;

    // Step 4: Name
    let name = elements.read_int8_string("array name")?;

    let header = ArrayHeader::from_flags(flags, nzmax, dims[..rank].to_vec(), name);
    trace!(
        "Array header: name={:?}, class={}, dims={:?}, complex={}, logical={}",
        header.name_str(),
        header.class_code,
        header.dims,
        header.is_complex,
        header.is_logical
    );
    Ok(header)
}
