//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the in-memory table (`Table`, `Column`, `ColumnData`)
//! - column classification (`ColumnKind`, `Schema`)
//! - run configuration (`AnalysisConfig`, `DateDetection`)

pub mod types;

pub use types::*;
