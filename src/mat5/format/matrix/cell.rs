use std::io::Read;

use ndarray::ArrayD;

use super::MatrixReader;
use crate::mat5::process::ArrayProcessor;
use crate::mat5::types::array::MatArray;
use crate::mat5::types::error::Result;
use crate::mat5::utils::{element_count, fortran_array};

impl<R: Read, P: ArrayProcessor> MatrixReader<R, P> {
    /// One nested matrix per cell, in column-major order.
    pub(super) fn read_cell(&mut self, shape: &[usize]) -> Result<ArrayD<MatArray>> {
        let cells = (0..element_count(shape)?)
            .map(|_| self.read_nested_matrix())
            .collect::<Result<Vec<_>>>()?;
        fortran_array(cells, shape)
    }
}
