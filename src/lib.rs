//! # mat5-reader
//!
//! A reader for MATLAB Level-5 binary (`.mat`) files, as written by MATLAB
//! versions 5 through 7.2 and by `save -v7`.
//! Decodes numeric, logical, complex, char, sparse, cell, struct and object
//! arrays from little- and big-endian files, including compressed variables.
//!
//! **Note:** HDF5-based v7.3 files and function handles are not supported.
pub mod mat5;

// Re-export the main types for convenience
pub use mat5::{
    MatError, Result,
    format::{element::Ownership, file_header::FileHeader, matrix::MatrixReader},
    iter::VariableIter,
    process::{ArrayProcessor, StandardProcessor},
    reader::MatFile,
    types::{
        array::{
            CharArray, MatArray, MatStruct, NumericData, ObjectArray, Record, SparseArray,
            SparseValues, StructArray, StructLayout,
        },
        models::{ArrayHeader, DType, MatClass, MatVariable, VariableInfo},
        options::{ReadOptions, StructMode},
    },
    utils::Endian,
};
