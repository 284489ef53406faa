//! chx - Hue-colored hex grid for the terminal
//!
//! Reads a file chunk by chunk and prints one colored cell per byte,
//! wrapped to the terminal width.

pub mod config;
pub mod driver;
pub mod glyph;
pub mod source;
pub mod ui;
