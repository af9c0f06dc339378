//! Foundational data structures, error types, lookup tables and options.

pub mod array;
pub mod error;
pub mod models;
pub mod options;
pub mod tables;
