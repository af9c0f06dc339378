//! Matrix decoding: the recursive class dispatcher.
//!
//! A matrix element is an `miMATRIX` tag followed by an array header and
//! class-specific sub-elements. [`MatrixReader`] reads the header, selects
//! the reader for the array class and hands the decoded array to its
//! [`ArrayProcessor`]. Cells, structs and objects recurse through
//! [`MatrixReader::read_nested_matrix`].
//!
//! # Submodules
//!
//! - `numeric`: real and complex numeric arrays, logicals
//! - `sparse`: compressed-sparse-column matrices
//! - `chars`: char arrays
//! - `cell`: cell arrays
//! - `structs`: struct and object field data

mod cell;
mod chars;
mod numeric;
mod sparse;
mod structs;

use std::io::Read;

use log::{debug, trace};
use ndarray::{ArrayD, IxDyn};

use super::array_header;
use super::element::ElementReader;
use crate::mat5::process::{ArrayProcessor, StandardProcessor};
use crate::mat5::types::array::{MatArray, NumericData, ObjectArray};
use crate::mat5::types::error::{MatError, Result};
use crate::mat5::types::models::{ArrayHeader, DType, MI_MATRIX, MatClass, MatVariable};
use crate::mat5::types::options::ReadOptions;
use crate::mat5::types::tables::TypeTables;
use crate::mat5::utils::{Endian, dims_to_shape};

/// Decodes matrix elements from a stream positioned at an `miMATRIX` tag.
#[derive(Debug)]
pub struct MatrixReader<R, P = StandardProcessor> {
    elements: ElementReader<R>,
    tables: TypeTables,
    options: ReadOptions,
    processor: P,
    depth: usize,
}

impl<R: Read> MatrixReader<R, StandardProcessor> {
    /// Create a reader with the standard post-processor.
    pub fn new(stream: R, endian: Endian, options: ReadOptions) -> Self {
        Self::with_processor(stream, endian, options, StandardProcessor)
    }
}

impl<R: Read, P: ArrayProcessor> MatrixReader<R, P> {
    /// Create a reader that post-processes arrays with `processor`.
    pub fn with_processor(stream: R, endian: Endian, options: ReadOptions, processor: P) -> Self {
        let tables = TypeTables::new(endian, options.uint16_codec);
        Self {
            elements: ElementReader::new(stream, endian),
            tables,
            options,
            processor,
            depth: 0,
        }
    }

    pub fn tables(&self) -> &TypeTables {
        &self.tables
    }

    /// Mutable tables, for registering or disabling text codecs.
    pub fn tables_mut(&mut self) -> &mut TypeTables {
        &mut self.tables
    }

    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    pub fn processor(&self) -> &P {
        &self.processor
    }

    pub fn get_mut(&mut self) -> &mut R {
        self.elements.get_mut()
    }

    pub fn into_inner(self) -> R {
        self.elements.into_inner()
    }

    /// Read an array header at the current position.
    pub fn read_header(&mut self) -> Result<ArrayHeader> {
        array_header::read_header(&mut self.elements)
    }

    /// Read a matrix tag and its header, without the array data.
    ///
    /// Returns `None` for a zero-length matrix, which has no header.
    pub fn read_var_header(&mut self) -> Result<Option<ArrayHeader>> {
        let byte_count = self.read_matrix_tag()?;
        if byte_count == 0 {
            return Ok(None);
        }
        self.read_header().map(Some)
    }

    /// Read the array data following `header`.
    pub fn read_var_array(&mut self, header: &ArrayHeader) -> Result<MatArray> {
        self.array_from_header(header)
    }

    /// Read a named top-level variable.
    pub fn read_top_level_matrix(&mut self) -> Result<MatVariable> {
        match self.read_var_header()? {
            None => Ok(MatVariable {
                name: String::new(),
                header: None,
                array: self.empty_matrix()?,
            }),
            Some(header) => {
                let array = self.array_from_header(&header)?;
                let name = header.name_str();
                debug!("Read variable '{}': {} {:?}", name, array.kind(), array.shape());
                Ok(MatVariable {
                    name,
                    header: Some(header),
                    array,
                })
            }
        }
    }

    /// Read an unnamed matrix nested in a cell, struct or object.
    pub fn read_nested_matrix(&mut self) -> Result<MatArray> {
        if self.depth >= self.options.max_depth {
            return Err(MatError::InvalidFormat(format!(
                "Nesting deeper than {} levels",
                self.options.max_depth
            )));
        }
        self.depth += 1;
        let result = match self.read_var_header() {
            Ok(None) => self.empty_matrix(),
            Ok(Some(header)) => self.array_from_header(&header),
            Err(e) => Err(e),
        };
        self.depth -= 1;
        result
    }

    fn read_matrix_tag(&mut self) -> Result<u32> {
        let tag = self.elements.read_full_tag()?;
        if tag.type_code != MI_MATRIX {
            return Err(MatError::TypeMismatch {
                context: "expecting matrix",
                expected: MI_MATRIX,
                found: tag.type_code,
            });
        }
        Ok(tag.byte_count)
    }

    /// The `[]` shortcut: an empty double array, never post-processed.
    fn empty_matrix(&self) -> Result<MatArray> {
        let shape: &[usize] = if self.options.squeeze_me { &[0] } else { &[1, 0] };
        trace!("Empty matrix shortcut, shape {:?}", shape);
        Ok(MatArray::Numeric(NumericData::Float64(ArrayD::zeros(IxDyn(shape)))))
    }

    fn process(&self, array: MatArray, inferred: Option<DType>) -> Result<MatArray> {
        self.processor.process(array, &self.options, inferred)
    }

    fn array_from_header(&mut self, header: &ArrayHeader) -> Result<MatArray> {
        let class = header.class()?;
        let shape = dims_to_shape(&header.dims)?;
        trace!("Dispatching {} array of shape {:?}", class, shape);

        match class {
            MatClass::Double
            | MatClass::Single
            | MatClass::Int8
            | MatClass::UInt8
            | MatClass::Int16
            | MatClass::UInt16
            | MatClass::Int32
            | MatClass::UInt32
            | MatClass::Int64
            | MatClass::UInt64 => {
                let inferred = if header.is_logical {
                    Some(DType::Bool)
                } else {
                    self.tables.class_dtype(class)
                };
                let data = self.read_numeric_array(header, &shape)?;
                self.process(MatArray::Numeric(data), inferred)
            }
            MatClass::Sparse => Ok(MatArray::Sparse(self.read_sparse(header, &shape)?)),
            MatClass::Char => {
                let chars = self.read_char(&shape)?;
                self.process(MatArray::Char(chars), None)
            }
            MatClass::Cell => {
                let cells = self.read_cell(&shape)?;
                self.process(MatArray::Cell(cells), None)
            }
            MatClass::Struct => {
                let fields = self.read_struct(&shape)?;
                self.process(MatArray::Struct(fields), None)
            }
            MatClass::Object => {
                let class_name = self.elements.read_int8_string("object class name")?;
                let class_name = String::from_utf8_lossy(&class_name).into_owned();
                let fields = self.read_struct(&shape)?;
                self.process(MatArray::Object(ObjectArray { class_name, fields }), None)
            }
            MatClass::Function | MatClass::Opaque => {
                Err(MatError::UnsupportedClass(header.class_code))
            }
        }
    }
}
