use std::io::Read;

use super::MatrixReader;
use crate::mat5::process::ArrayProcessor;
use crate::mat5::types::array::{ElementData, NumericData};
use crate::mat5::types::error::{MatError, Result};
use crate::mat5::types::models::ArrayHeader;
use crate::mat5::utils::element_count;

impl<R: Read, P: ArrayProcessor> MatrixReader<R, P> {
    /// Real part, then imaginary part when the header is complex.
    pub(super) fn read_numeric_array(&mut self, header: &ArrayHeader, shape: &[usize]) -> Result<NumericData> {
        let expected = element_count(shape)?;
        let real = self.elements.read_numeric_element(&self.tables)?;
        check_count(&real, expected, "real part")?;

        if header.is_complex {
            let imag = self.elements.read_numeric_element(&self.tables)?;
            check_count(&imag, expected, "imaginary part")?;
            ElementData::into_complex(real, imag, shape)
        } else {
            real.into_numeric(shape)
        }
    }
}

fn check_count(data: &ElementData, expected: usize, part: &str) -> Result<()> {
    if data.len() != expected {
        return Err(MatError::InvalidFormat(format!(
            "Numeric {} holds {} values, dimensions require {}",
            part,
            data.len(),
            expected
        )));
    }
    Ok(())
}
