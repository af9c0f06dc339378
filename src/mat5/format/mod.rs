//! File format parsing layer for MAT5 files.
//!
//! This module bridges raw stream I/O and the high-level
//! [`MatFile`](crate::mat5::reader::MatFile).
//!
//! # Module Organization
//!
//! - [`file_header`]: Parses the 128-byte header and detects byte order
//! - [`tag`]: Decodes 8-byte element tags, including small data elements
//! - [`element`]: Reads tagged payloads and skips their padding
//! - [`array_header`]: Decodes flags, dimensions and name of a matrix
//! - [`matrix`]: Dispatches on array class and rebuilds each array
//!
//! # Architecture
//!
//! ```text
//! File Structure:
//! ┌─────────────────┐
//! │  File Header    │ ← file_header::parse()
//! ├─────────────────┤
//! │  miMATRIX       │ ← matrix::MatrixReader
//! │   ├ header      │ ← array_header::read_header()
//! │   └ elements    │ ← element::ElementReader
//! ├─────────────────┤
//! │  miCOMPRESSED   │ ← inflated, then as above
//! └─────────────────┘
//! ```

pub mod array_header;
pub mod element;
pub mod file_header;
pub mod matrix;
pub mod tag;
