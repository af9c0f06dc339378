//! Decompression of `miCOMPRESSED` variables.
//!
//! MATLAB v7 files store each compressed variable as one zlib stream whose
//! inflated bytes are a complete `miMATRIX` element, tag included.

use std::io::Read;

use flate2::read::ZlibDecoder;
use log::trace;

use crate::mat5::types::error::{MatError, Result};

/// Inflates a zlib payload into a new buffer.
pub fn inflate(payload: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    inflate_into(&mut output, payload)?;
    Ok(output)
}

/// Inflates a zlib payload into `output`, replacing its contents.
pub fn inflate_into(output: &mut Vec<u8>, payload: &[u8]) -> Result<()> {
    output.clear();
    let mut decoder = ZlibDecoder::new(payload);
    decoder.read_to_end(output).map_err(|e| {
        MatError::DecompressionError(format!("Zlib decompression failed: {}", e))
    })?;
    trace!("Inflated {} bytes -> {} bytes", payload.len(), output.len());
    Ok(())
}
