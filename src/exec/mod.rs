//! Bounded worker pool and per-column task fan-out.

pub mod pool;

pub use pool::*;
