//! Terminal output for a finished run.
//!
//! Logging covers progress; this is the one block of plain text printed at
//! the end, so output changes stay localized.

pub mod format;

pub use format::*;
