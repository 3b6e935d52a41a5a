//! Configuration module
//!
//! Read-only user settings: table glyphs, column width strategy and the
//! default delimiter.

pub mod config;
