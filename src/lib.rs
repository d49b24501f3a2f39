//! `eda-report` library crate.
//!
//! The binary (`eda`) is a thin wrapper around this library so that:
//!
//! - every stage is testable without spawning processes
//! - the pipeline can be driven with a ready-made [`domain::AnalysisConfig`]

pub mod analysis;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod exec;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
