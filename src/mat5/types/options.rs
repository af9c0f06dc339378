//! Reader configuration.

use encoding_rs::Encoding;

/// Output layout for struct arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StructMode {
    /// One positional record per instance, aligned with the shared field names.
    #[default]
    Record,
    /// One name → value map per instance.
    Map,
}

/// Options controlling how variables are decoded and post-processed.
///
/// Built with chained setters:
///
/// ```
/// use mat5_reader::{ReadOptions, StructMode};
///
/// let options = ReadOptions::new()
///     .struct_mode(StructMode::Map)
///     .squeeze_me(true)
///     .chars_as_strings(true);
/// assert_eq!(options.struct_mode, StructMode::Map);
/// ```
#[derive(Debug, Clone)]
pub struct ReadOptions {
    pub struct_mode: StructMode,
    /// Drop singleton dimensions from every processed array.
    pub squeeze_me: bool,
    /// Recast numeric data to the MATLAB class dtype (bool for logicals).
    pub mat_dtype: bool,
    /// Join char matrices into strings along their last axis.
    pub chars_as_strings: bool,
    /// Encoding for `miUINT16` char data; `None` means UTF-16 in file byte order.
    pub uint16_codec: Option<&'static Encoding>,
    /// Deepest allowed nesting of cells and structs.
    pub max_depth: usize,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            struct_mode: StructMode::Record,
            squeeze_me: false,
            mat_dtype: false,
            chars_as_strings: false,
            uint16_codec: None,
            max_depth: 128,
        }
    }
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn struct_mode(mut self, mode: StructMode) -> Self {
        self.struct_mode = mode;
        self
    }

    pub fn squeeze_me(mut self, squeeze: bool) -> Self {
        self.squeeze_me = squeeze;
        self
    }

    pub fn mat_dtype(mut self, mat_dtype: bool) -> Self {
        self.mat_dtype = mat_dtype;
        self
    }

    pub fn chars_as_strings(mut self, chars_as_strings: bool) -> Self {
        self.chars_as_strings = chars_as_strings;
        self
    }

    pub fn uint16_codec(mut self, encoding: &'static Encoding) -> Self {
        self.uint16_codec = Some(encoding);
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}
