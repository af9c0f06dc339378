//! MAT5 file header parsing.
//!
//! # Header Structure
//! ```text
//! [116 bytes] Descriptive text, space or null padded
//! [  8 bytes] Subsystem data offset
//! [  2 bytes] Version, 0x0100
//! [  2 bytes] Endian indicator, "IM" when written little-endian, "MI" when big-endian
//! ```

use std::io::Read;

use log::{debug, info};

use crate::mat5::types::error::{MatError, Result};
use crate::mat5::utils::Endian;

pub const FILE_HEADER_LEN: usize = 128;
const DESCRIPTION_LEN: usize = 116;
const SUPPORTED_VERSION: u16 = 0x0100;

/// Metadata from the 128-byte header that opens a MAT5 file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub description: String,
    pub subsys_offset: u64,
    pub version: u16,
    pub endian: Endian,
}

impl FileHeader {
    /// Whether the header points at a subsystem data block.
    ///
    /// Offsets of all zeros or all spaces mean there is none.
    pub fn has_subsystem(&self) -> bool {
        self.subsys_offset != 0 && self.subsys_offset != 0x2020_2020_2020_2020
    }
}

/// Parse the file header from the start of a MAT5 stream.
pub fn parse<R: Read>(stream: &mut R) -> Result<FileHeader> {
    info!("Parsing MAT5 file header");

    let mut raw = [0u8; FILE_HEADER_LEN];
    stream.read_exact(&mut raw)?;

    // Step 1: The endian indicator decides how every later word is read
    let endian = match &raw[126..128] {
        b"IM" => Endian::Little,
        b"MI" => Endian::Big,
        other => {
            return Err(MatError::InvalidFormat(format!(
                "not a MAT5 file: endian indicator {:?}",
                String::from_utf8_lossy(other)
            )));
        }
    };

    // Step 2: Version
    let version = endian.read_u16(&raw[124..126]);
    if version != SUPPORTED_VERSION {
        return Err(MatError::InvalidFormat(format!(
            "Unsupported MAT file version {:#06x}",
            version
        )));
    }

    let subsys_offset = endian.read_u64(&raw[116..124]);
    let description = String::from_utf8_lossy(&raw[..DESCRIPTION_LEN])
        .trim_end_matches(['\0', ' '])
        .to_string();

    debug!("MAT5 header: {} (byte order: {})", description, endian);
    Ok(FileHeader {
        description,
        subsys_offset,
        version,
        endian,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn header_bytes(text: &str, version: [u8; 2], indicator: &[u8; 2]) -> Vec<u8> {
        let mut raw = vec![b' '; FILE_HEADER_LEN];
        raw[..text.len()].copy_from_slice(text.as_bytes());
        raw[116..124].fill(0);
        raw[124..126].copy_from_slice(&version);
        raw[126..128].copy_from_slice(indicator);
        raw
    }

    #[test]
    fn little_and_big_endian_indicators() {
        let header = parse(&mut Cursor::new(header_bytes("MATLAB 5.0 MAT-file", [0x00, 0x01], b"IM"))).unwrap();
        assert_eq!(header.endian, Endian::Little);
        assert_eq!(header.description, "MATLAB 5.0 MAT-file");
        assert!(!header.has_subsystem());

        let header = parse(&mut Cursor::new(header_bytes("x", [0x01, 0x00], b"MI"))).unwrap();
        assert_eq!(header.endian, Endian::Big);
        assert_eq!(header.version, 0x0100);
    }

    #[test]
    fn rejects_unknown_indicator_and_version() {
        let err = parse(&mut Cursor::new(header_bytes("x", [0x00, 0x01], b"XX"))).unwrap_err();
        assert!(matches!(err, MatError::InvalidFormat(msg) if msg.contains("not a MAT5 file")));
        let err = parse(&mut Cursor::new(header_bytes("x", [0x00, 0x02], b"IM"))).unwrap_err();
        assert!(matches!(err, MatError::InvalidFormat(_)));
    }

    #[test]
    fn short_stream_is_an_io_error() {
        assert!(matches!(parse(&mut Cursor::new(vec![0u8; 20])), Err(MatError::Io(_))));
    }
}
