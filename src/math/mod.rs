//! Mathematical utilities: summary statistics, density estimation, correlation.

pub mod corr;
pub mod kde;
pub mod stats;

pub use corr::*;
pub use kde::*;
pub use stats::*;
