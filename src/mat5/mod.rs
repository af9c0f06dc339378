//! Core MAT5 reader module

pub mod codec;
pub mod format;
pub mod iter;
pub mod process;
pub mod reader;
pub mod types;
pub mod utils;

pub use types::error::{MatError, Result};
