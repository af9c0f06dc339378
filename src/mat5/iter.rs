//! Sequential access to the variables of a MAT5 file.
//!
//! Each top-level element is read whole into memory, inflated when it is
//! `miCOMPRESSED`, and decoded from that buffer. The file position therefore
//! always lands on the next variable, even when decoding the current one fails.
//!
//! # Example
//! ```no_run
//! # use mat5_reader::{MatFile, ReadOptions};
//! let mut file = MatFile::open("data.mat", ReadOptions::default()).unwrap();
//! for variable in file.iter_variables().unwrap() {
//!     match variable {
//!         Ok(v) => println!("{}: {} {:?}", v.name, v.array.kind(), v.array.shape()),
//!         Err(e) => eprintln!("skipped: {}", e),
//!     }
//! }
//! ```

use std::io::{self, Cursor, Read};

use log::{debug, trace, warn};

use super::codec::compression;
use super::format::matrix::MatrixReader;
use super::format::tag;
use super::process::{ArrayProcessor, StandardProcessor};
use super::types::error::{MatError, Result};
use super::types::models::{ArrayHeader, MI_COMPRESSED, MI_MATRIX, MatVariable};
use super::types::options::ReadOptions;
use super::utils::Endian;

/// Error context for top-level elements that are neither matrices nor compressed.
pub const TOP_LEVEL_CONTEXT: &str = "top-level variable";

/// Iterator over the top-level variables of a stream positioned after the file header.
///
/// Yields `Result<MatVariable>`. A variable that fails to decode yields an
/// error and iteration carries on; a truncated stream ends iteration.
///
/// Created by [`MatFile::iter_variables()`](crate::MatFile::iter_variables).
pub struct VariableIter<'a, R, P = StandardProcessor> {
    stream: &'a mut R,
    endian: Endian,
    decoder: MatrixReader<Cursor<Vec<u8>>, P>,
    finished: bool,
}

impl<'a, R: Read> VariableIter<'a, R, StandardProcessor> {
    pub fn new(stream: &'a mut R, endian: Endian, options: ReadOptions) -> Self {
        Self::with_processor(stream, endian, options, StandardProcessor)
    }
}

impl<'a, R: Read, P: ArrayProcessor> VariableIter<'a, R, P> {
    pub fn with_processor(stream: &'a mut R, endian: Endian, options: ReadOptions, processor: P) -> Self {
        Self {
            stream,
            endian,
            decoder: MatrixReader::with_processor(Cursor::new(Vec::new()), endian, options, processor),
            finished: false,
        }
    }

    /// Header of the next variable, without decoding its data.
    ///
    /// The inner `None` is a zero-length matrix, which has no header.
    pub fn next_header(&mut self) -> Option<Result<Option<ArrayHeader>>> {
        Some(self.advance()?.and_then(|()| self.decoder.read_var_header()))
    }

    /// Decode the data of the variable whose header was just returned by
    /// [`next_header`](Self::next_header).
    pub fn read_current(&mut self, header: &ArrayHeader) -> Result<MatVariable> {
        let array = self.decoder.read_var_array(header)?;
        Ok(MatVariable {
            name: header.name_str(),
            header: Some(header.clone()),
            array,
        })
    }

    /// Load the next top-level element into the decoder.
    fn advance(&mut self) -> Option<Result<()>> {
        if self.finished {
            return None;
        }
        let raw_tag = match read_tag_or_eof(self.stream) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                trace!("End of variable stream");
                self.finished = true;
                return None;
            }
            Err(e) => {
                self.finished = true;
                return Some(Err(e));
            }
        };

        let tag = tag::decode_full_tag(raw_tag, self.endian.needs_swap());
        let payload = match read_exact_vec(self.stream, tag.byte_count as usize) {
            Ok(payload) => payload,
            Err(e) => {
                self.finished = true;
                return Some(Err(e));
            }
        };

        let bytes = match tag.type_code {
            MI_MATRIX => {
                let mut bytes = Vec::with_capacity(raw_tag.len() + payload.len());
                bytes.extend_from_slice(&raw_tag);
                bytes.extend_from_slice(&payload);
                bytes
            }
            MI_COMPRESSED => {
                debug!("Inflating compressed variable of {} bytes", payload.len());
                match compression::inflate(&payload) {
                    Ok(bytes) => bytes,
                    Err(e) => return Some(Err(e)),
                }
            }
            other => {
                warn!("Skipping top-level element of type {}", other);
                return Some(Err(MatError::TypeMismatch {
                    context: TOP_LEVEL_CONTEXT,
                    expected: MI_MATRIX,
                    found: other,
                }));
            }
        };

        *self.decoder.get_mut() = Cursor::new(bytes);
        Some(Ok(()))
    }
}

impl<R: Read, P: ArrayProcessor> Iterator for VariableIter<'_, R, P> {
    type Item = Result<MatVariable>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.advance()?.and_then(|()| self.decoder.read_top_level_matrix()))
    }
}

/// Read an 8-byte tag; `None` on a clean end of stream before its first byte.
fn read_tag_or_eof<R: Read>(stream: &mut R) -> Result<Option<[u8; 8]>> {
    let mut raw = [0u8; 8];
    let mut filled = 0;
    while filled < raw.len() {
        match stream.read(&mut raw[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    match filled {
        0 => Ok(None),
        8 => Ok(Some(raw)),
        n => Err(MatError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("Truncated variable tag: {} of 8 bytes", n),
        ))),
    }
}

fn read_exact_vec<R: Read>(stream: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let got = stream.take(len as u64).read_to_end(&mut buf)?;
    if got < len {
        return Err(MatError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("Truncated variable: expected {} bytes, got {}", len, got),
        )));
    }
    Ok(buf)
}
