//! Command-line parsing for the EDA report generator.
//!
//! Parsing stays here; `app` turns the parsed flags into an
//! [`AnalysisConfig`](crate::domain::AnalysisConfig) and validates them.
//! Every flag can also come from the environment (or a `.env` file).

use std::path::PathBuf;

use clap::Parser;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "eda",
    version,
    about = "One-shot exploratory data analysis report for a CSV file"
)]
pub struct Cli {
    /// CSV file to analyze.
    #[arg(env = "EDA_INPUT")]
    pub input: PathBuf,

    /// Directory for the generated artifacts (created if missing).
    #[arg(short = 'o', long, env = "EDA_OUTPUT_DIR", default_value = "eda_output")]
    pub output_dir: PathBuf,

    /// Field delimiter (a single ASCII character).
    #[arg(short = 'd', long, env = "EDA_DELIMITER", default_value_t = ',')]
    pub delimiter: char,

    /// Worker threads for the per-column stages (default: all cores).
    #[arg(short = 'j', long, env = "EDA_JOBS")]
    pub jobs: Option<usize>,

    /// Share of values that must parse as dates for a column to be date-like.
    #[arg(long, env = "EDA_DATE_THRESHOLD", default_value_t = 0.9)]
    pub date_threshold: f64,

    /// Treat this text column as a date column (repeatable).
    #[arg(long = "date-column", value_name = "NAME")]
    pub date_columns: Vec<String>,

    /// Never treat this column as a date column (repeatable).
    #[arg(long = "ignore-date-column", value_name = "NAME")]
    pub ignore_date_columns: Vec<String>,
}
