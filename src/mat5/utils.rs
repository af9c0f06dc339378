//! Low-level byte order and shape utilities

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use ndarray::{ArrayD, IxDyn, ShapeBuilder};

use super::types::error::{MatError, Result};

/// Byte order declared by a MAT5 file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    /// Byte order of the machine running the reader.
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            Endian::Big
        } else {
            Endian::Little
        }
    }

    /// Whether words read in native order must be swapped to match this order.
    pub fn needs_swap(&self) -> bool {
        *self != Endian::native()
    }

    pub fn read_u16(&self, buf: &[u8]) -> u16 {
        match self {
            Endian::Little => LittleEndian::read_u16(buf),
            Endian::Big => BigEndian::read_u16(buf),
        }
    }

    pub fn read_u32(&self, buf: &[u8]) -> u32 {
        match self {
            Endian::Little => LittleEndian::read_u32(buf),
            Endian::Big => BigEndian::read_u32(buf),
        }
    }

    pub fn read_i32(&self, buf: &[u8]) -> i32 {
        match self {
            Endian::Little => LittleEndian::read_i32(buf),
            Endian::Big => BigEndian::read_i32(buf),
        }
    }

    pub fn read_u64(&self, buf: &[u8]) -> u64 {
        match self {
            Endian::Little => LittleEndian::read_u64(buf),
            Endian::Big => BigEndian::read_u64(buf),
        }
    }
}

impl std::fmt::Display for Endian {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Endian::Little => write!(f, "little-endian"),
            Endian::Big => write!(f, "big-endian"),
        }
    }
}

/// Reverse the byte order of a 32-bit word.
#[inline]
pub fn byteswap_u32(word: u32) -> u32 {
    word.swap_bytes()
}

/// Number of padding bytes after a full-format payload of `byte_count` bytes.
#[inline]
pub fn padding_for(byte_count: usize) -> usize {
    (8 - byte_count % 8) % 8
}

/// Convert MATLAB dimensions to ndarray extents, rejecting negative sizes.
pub fn dims_to_shape(dims: &[i32]) -> Result<Vec<usize>> {
    dims.iter()
        .map(|&d| {
            usize::try_from(d)
                .map_err(|_| MatError::InvalidFormat(format!("Negative dimension {} in {:?}", d, dims)))
        })
        .collect()
}

/// Total element count for a shape.
///
/// Fails when the product of the nonzero extents overflows or exceeds
/// `isize::MAX`, the largest shape ndarray accepts.
pub fn element_count(shape: &[usize]) -> Result<usize> {
    let nonzero = shape
        .iter()
        .filter(|&&extent| extent != 0)
        .try_fold(1usize, |acc, &extent| acc.checked_mul(extent))
        .filter(|&count| count <= isize::MAX as usize)
        .ok_or_else(|| MatError::InvalidFormat(format!("Dimensions {:?} hold too many elements", shape)))?;
    Ok(if shape.contains(&0) { 0 } else { nonzero })
}

/// Build an array from values stored in column-major order.
///
/// Indexing the result with MATLAB subscripts yields the MATLAB element:
/// `a[[row, col]] == values[col * rows + row]`.
pub fn fortran_array<T>(values: Vec<T>, shape: &[usize]) -> Result<ArrayD<T>> {
    Ok(ArrayD::from_shape_vec(IxDyn(shape).f(), values)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_rounds_up_to_eight() {
        assert_eq!(padding_for(0), 0);
        assert_eq!(padding_for(3), 5);
        assert_eq!(padding_for(5), 3);
        assert_eq!(padding_for(8), 0);
        assert_eq!(padding_for(13), 3);
    }

    #[test]
    fn negative_dimension_is_rejected() {
        assert!(dims_to_shape(&[2, 3]).is_ok());
        assert!(matches!(dims_to_shape(&[2, -1]), Err(MatError::InvalidFormat(_))));
    }

    #[test]
    fn element_count_rejects_overflowing_shapes() {
        assert_eq!(element_count(&[2, 3, 4]).unwrap(), 24);
        assert_eq!(element_count(&[]).unwrap(), 1);
        assert_eq!(element_count(&[0, 1 << 20, 3]).unwrap(), 0);
        assert!(matches!(element_count(&[usize::MAX, 2]), Err(MatError::InvalidFormat(_))));
        assert!(matches!(element_count(&[0, usize::MAX, 2]), Err(MatError::InvalidFormat(_))));
        assert!(matches!(element_count(&[1 << 40, 1 << 40]), Err(MatError::InvalidFormat(_))));
    }

    #[test]
    fn fortran_array_places_column_major_values() {
        let a = fortran_array((0..6).collect::<Vec<i32>>(), &[2, 3]).unwrap();
        for row in 0..2 {
            for col in 0..3 {
                assert_eq!(a[[row, col]], (col * 2 + row) as i32);
            }
        }
    }

    #[test]
    fn endian_reads_follow_declared_order() {
        let bytes = [0x01, 0x02, 0x03, 0x04];
        assert_eq!(Endian::Little.read_u32(&bytes), 0x0403_0201);
        assert_eq!(Endian::Big.read_u32(&bytes), 0x0102_0304);
        assert_eq!(byteswap_u32(0x0102_0304), 0x0403_0201);
    }
}
