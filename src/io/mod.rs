//! Input/output helpers.
//!
//! - CSV ingest + normalization (`ingest`)
//! - CSV artifacts (`export`)
//! - the categorical workbook (`workbook`)
//! - artifact and sheet naming (`names`)

pub mod export;
pub mod ingest;
pub mod names;
pub mod workbook;

pub use export::*;
pub use ingest::*;
pub use names::*;
pub use workbook::*;
