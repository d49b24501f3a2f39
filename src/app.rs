//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and installs the log subscriber
//! - parses and validates CLI arguments
//! - runs the report pipeline
//! - prints the run summary

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::domain::{AnalysisConfig, DateDetection};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `eda` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let config = config_from_args(&cli)?;
    let run = pipeline::run_analysis(&config)?;

    println!("{}", crate::report::format_run_summary(&run));
    Ok(())
}

/// Logs go to stderr so stdout carries only the summary. `RUST_LOG`
/// overrides the default `info` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber may already be installed (tests, embedding callers).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn config_from_args(cli: &Cli) -> Result<AnalysisConfig, AppError> {
    if !cli.delimiter.is_ascii() {
        return Err(AppError::input(format!(
            "Delimiter must be a single ASCII character, got '{}'.",
            cli.delimiter
        )));
    }
    if cli.jobs == Some(0) {
        return Err(AppError::input("--jobs must be at least 1."));
    }
    if !(cli.date_threshold > 0.0 && cli.date_threshold <= 1.0) {
        return Err(AppError::input(format!(
            "--date-threshold must be in (0, 1], got {}.",
            cli.date_threshold
        )));
    }
    if let Some(name) = cli.date_columns.iter().find(|n| cli.ignore_date_columns.contains(n)) {
        return Err(AppError::input(format!(
            "Column `{name}` is both forced and ignored as a date column."
        )));
    }

    Ok(AnalysisConfig {
        input_path: cli.input.clone(),
        output_dir: cli.output_dir.clone(),
        delimiter: cli.delimiter as u8,
        jobs: cli.jobs,
        dates: DateDetection {
            threshold: cli.date_threshold,
            force: cli.date_columns.clone(),
            ignore: cli.ignore_date_columns.clone(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EXIT_INPUT;

    fn cli(args: &[&str]) -> Cli {
        let argv = std::iter::once("eda").chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn flags_become_config() {
        let config = config_from_args(&cli(&[
            "in.csv",
            "-d",
            ";",
            "-j",
            "2",
            "--date-threshold",
            "0.75",
            "--date-column",
            "when",
        ]))
        .unwrap();
        assert_eq!(config.delimiter, b';');
        assert_eq!(config.jobs, Some(2));
        assert_eq!(config.dates.threshold, 0.75);
        assert_eq!(config.dates.force, ["when"]);
    }

    #[test]
    fn invalid_values_are_input_errors() {
        for args in [
            &["in.csv", "-d", "§"][..],
            &["in.csv", "-j", "0"],
            &["in.csv", "--date-threshold", "0"],
            &["in.csv", "--date-threshold", "1.5"],
            &["in.csv", "--date-column", "a", "--ignore-date-column", "a"],
        ] {
            let err = config_from_args(&cli(args)).unwrap_err();
            assert_eq!(err.exit_code(), EXIT_INPUT, "{args:?}");
        }
    }
}
