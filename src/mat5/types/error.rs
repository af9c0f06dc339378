//! Custom error types for the mat5-reader crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum MatError {
    /// An error originating from I/O operations, including truncated streams.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The stream is structurally invalid or does not conform to the MAT5 layout.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// An element carried a different type code than the one required at its position.
    #[error("Type mismatch for {context}: expected type code {expected}, found {found}")]
    TypeMismatch {
        context: &'static str,
        expected: u32,
        found: u32,
    },

    /// The array class cannot be decoded (function handles, opaque objects, unknown codes).
    #[error("Unsupported array class: {0}")]
    UnsupportedClass(u8),

    /// A char element uses a type code that has no text codec.
    #[error("Unsupported text encoding for element type {0}")]
    UnsupportedEncoding(u32),

    /// Char data is not valid for the codec selected for it.
    #[error("Text decoding failed: {0}")]
    TextDecode(String),

    /// An error occurred while inflating a compressed variable.
    #[error("Decompression failed: {0}")]
    DecompressionError(String),

    /// The decoded data does not fit the declared array shape.
    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

impl MatError {
    /// Whether a caller iterating over variables can drop this one and carry on.
    pub fn is_skippable(&self) -> bool {
        matches!(self, MatError::UnsupportedClass(_) | MatError::UnsupportedEncoding(_))
    }
}

/// A convenience `Result` type alias using the crate's `MatError` type.
pub type Result<T> = std::result::Result<T, MatError>;
