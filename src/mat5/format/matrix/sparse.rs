//! Sparse matrices.
//!
//! # Element Order
//! ```text
//! [row indices]     ir, at least nnz entries (nzmax may be larger)
//! [column pointers] jc, at least cols + 1 entries
//! [real values]     pr
//! [imag values]     pi, complex arrays only
//! ```

use std::io::Read;

use log::debug;
use num_complex::Complex64;

use super::MatrixReader;
use crate::mat5::process::ArrayProcessor;
use crate::mat5::types::array::{ElementData, SparseArray, SparseValues};
use crate::mat5::types::error::{MatError, Result};
use crate::mat5::types::models::ArrayHeader;

impl<R: Read, P: ArrayProcessor> MatrixReader<R, P> {
    pub(super) fn read_sparse(&mut self, header: &ArrayHeader, shape: &[usize]) -> Result<SparseArray> {
        let &[rows, cols] = shape else {
            return Err(MatError::InvalidFormat(format!(
                "Sparse arrays must be 2-D, got dimensions {:?}",
                shape
            )));
        };

        let mut row_data = self.elements.read_numeric_element(&self.tables)?;
        let col_data = self.elements.read_numeric_element(&self.tables)?;

        // Column pointers beyond cols + 1 are padding
        let mut indptr = col_data.to_indices("column pointer")?;
        if indptr.len() < cols + 1 {
            return Err(MatError::InvalidFormat(format!(
                "Sparse array with {} columns has only {} column pointers",
                cols,
                indptr.len()
            )));
        }
        indptr.truncate(cols + 1);
        if indptr.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(MatError::InvalidFormat(
                "Sparse column pointers are not monotonic".to_string(),
            ));
        }
        let nnz = indptr[cols];

        // Row indices and values beyond nnz are padding up to nzmax
        truncate_to_nnz(&mut row_data, nnz, "row indices")?;
        let indices = row_data.to_indices("row index")?;
        if let Some(&row) = indices.iter().find(|&&row| row >= rows) {
            return Err(MatError::InvalidFormat(format!(
                "Sparse row index {} out of range for {} rows",
                row, rows
            )));
        }

        let mut real = self.elements.read_numeric_element(&self.tables)?;
        truncate_to_nnz(&mut real, nnz, "values")?;
        let values = if header.is_complex {
            let mut imag = self.elements.read_numeric_element(&self.tables)?;
            truncate_to_nnz(&mut imag, nnz, "imaginary values")?;
            SparseValues::Complex(
                real.to_f64()
                    .into_iter()
                    .zip(imag.to_f64())
                    .map(|(re, im)| Complex64::new(re, im))
                    .collect(),
            )
        } else if header.is_logical {
            SparseValues::Logical(real.to_f64().into_iter().map(|x| x != 0.0).collect())
        } else {
            SparseValues::Real(real.to_f64())
        };

        debug!(
            "Sparse {}x{} array: nnz={}, nzmax={}",
            rows, cols, nnz, header.nzmax
        );
        Ok(SparseArray {
            rows,
            cols,
            indptr,
            indices,
            values,
        })
    }
}

fn truncate_to_nnz(data: &mut ElementData, nnz: usize, part: &str) -> Result<()> {
    if data.len() < nnz {
        return Err(MatError::InvalidFormat(format!(
            "Sparse {} hold {} entries, column pointers require {}",
            part,
            data.len(),
            nnz
        )));
    }
    data.truncate(nnz);
    Ok(())
}
