use std::io::Read;

use super::MatrixReader;
use crate::mat5::codec::text;
use crate::mat5::format::element::Ownership;
use crate::mat5::process::ArrayProcessor;
use crate::mat5::types::array::CharArray;
use crate::mat5::types::error::{MatError, Result};
use crate::mat5::types::models::{MI_INT8, MI_UINT8, MI_UINT16};
use crate::mat5::types::tables::TextCodec;
use crate::mat5::utils::{element_count, fortran_array};

impl<R: Read, P: ArrayProcessor> MatrixReader<R, P> {
    /// Decode one char element and shape its characters to `shape`.
    pub(super) fn read_char(&mut self, shape: &[usize]) -> Result<CharArray> {
        let endian = self.tables.endian();
        let element = self.elements.read_element(Ownership::Borrowed)?;
        let decoded = match element.type_code {
            MI_INT8 | MI_UINT8 => text::decode(&element.data, TextCodec::Ascii)?,
            MI_UINT16 => text::decode_uint16(&element.data, self.tables.uint16_codec(), endian)?,
            code => text::decode(&element.data, self.tables.codec(code)?)?,
        };

        let chars: Vec<char> = decoded.chars().collect();
        let expected = element_count(shape)?;
        if chars.len() != expected {
            return Err(MatError::InvalidFormat(format!(
                "Char data holds {} characters, dimensions require {}",
                chars.len(),
                expected
            )));
        }
        Ok(CharArray::Chars(fortran_array(chars, shape)?))
    }
}
