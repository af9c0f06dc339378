//! Post-processing applied to every decoded array except sparse matrices.
//!
//! The standard processor, in order:
//! 1. recasts numeric data to its MATLAB class dtype (`mat_dtype`)
//! 2. joins char matrices into strings along the last axis (`chars_as_strings`)
//! 3. drops singleton dimensions (`squeeze_me`)

use ndarray::{Array1, ArrayD, Axis};

use crate::mat5::types::array::{
    CharArray, MatArray, NumericData, ObjectArray, StructArray, StructLayout, map_numeric,
};
use crate::mat5::types::error::Result;
use crate::mat5::types::models::DType;
use crate::mat5::types::options::ReadOptions;

/// Hook between array decoding and the caller.
pub trait ArrayProcessor {
    /// Transform `array`. `inferred` is the class dtype of numeric arrays
    /// (`Bool` for logicals) and `None` for every other class.
    fn process(&self, array: MatArray, options: &ReadOptions, inferred: Option<DType>) -> Result<MatArray>;
}

/// Applies the transformations enabled in [`ReadOptions`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardProcessor;

impl ArrayProcessor for StandardProcessor {
    fn process(&self, array: MatArray, options: &ReadOptions, inferred: Option<DType>) -> Result<MatArray> {
        let array = match array {
            MatArray::Numeric(data) if options.mat_dtype => match inferred {
                Some(dtype) => MatArray::Numeric(data.cast(dtype)),
                None => MatArray::Numeric(data),
            },
            MatArray::Char(CharArray::Chars(chars)) if options.chars_as_strings => {
                MatArray::Char(chars_to_strings(chars))
            }
            other => other,
        };
        Ok(if options.squeeze_me {
            squeeze_array(array)
        } else {
            array
        })
    }
}

/// Join characters along the last axis; the result has one dimension fewer.
pub fn chars_to_strings(chars: ArrayD<char>) -> CharArray {
    if chars.ndim() == 0 {
        return CharArray::Chars(chars);
    }
    let last = Axis(chars.ndim() - 1);
    CharArray::Strings(chars.map_axis(last, |lane| lane.iter().collect::<String>()))
}

/// Remove every length-1 axis. Empty arrays become 1-D with length zero.
pub fn squeeze<T>(array: ArrayD<T>) -> ArrayD<T> {
    if array.is_empty() {
        return Array1::from_vec(Vec::new()).into_dyn();
    }
    let mut array = array;
    for axis in (0..array.ndim()).rev() {
        if array.len_of(Axis(axis)) == 1 {
            array = array.index_axis_move(Axis(axis), 0);
        }
    }
    array
}

/// Squeeze any array kind. Sparse matrices keep their two dimensions.
pub fn squeeze_array(array: MatArray) -> MatArray {
    match array {
        MatArray::Numeric(data) => MatArray::Numeric(map_numeric!(data, a => squeeze(a))),
        MatArray::Char(CharArray::Chars(a)) => MatArray::Char(CharArray::Chars(squeeze(a))),
        MatArray::Char(CharArray::Strings(a)) => MatArray::Char(CharArray::Strings(squeeze(a))),
        MatArray::Cell(a) => MatArray::Cell(squeeze(a)),
        MatArray::Struct(s) => MatArray::Struct(squeeze_struct(s)),
        MatArray::Object(o) => MatArray::Object(ObjectArray {
            class_name: o.class_name,
            fields: squeeze_struct(o.fields),
        }),
        sparse @ MatArray::Sparse(_) => sparse,
    }
}

fn squeeze_struct(array: StructArray) -> StructArray {
    let layout = match array.layout {
        StructLayout::Record(a) => StructLayout::Record(squeeze(a)),
        StructLayout::Map(a) => StructLayout::Map(squeeze(a)),
        StructLayout::Empty(a) => StructLayout::Empty(squeeze(a)),
    };
    StructArray {
        field_names: array.field_names,
        layout,
    }
}
