//! Data access layer
//!
//! Byte-offset navigation over a delimited text file and windowed record
//! reads starting at a given offset. Nothing here keeps the whole file in
//! memory.

pub mod line_navigator;
pub mod window_reader;
