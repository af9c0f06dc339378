//! Codec layer for decompression and text decoding.
//!
//! # Submodules
//!
//! - [`compression`][]: zlib inflation of compressed variables
//! - [`text`][]: char data decoding (ASCII, UTF-8/16/32)

pub mod compression;
pub mod text;
