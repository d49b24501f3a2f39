//! The report pipeline shared by the binary and the end-to-end tests.
//!
//! load -> normalize -> classify -> stages 1..7, strictly in that order.
//! Every stage reads the same `&Table` and `&Schema`; the two parallel
//! stages (distributions, outliers) and the time-series stage fan out one
//! task per column and collect per-column outcomes before moving on.
//!
//! Fatal errors ([`AppError`]) stop the run. Everything the run is allowed
//! to survive lands in [`RunOutput::failures`].

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};

use rayon::ThreadPool;
use tracing::{info, warn};

use crate::analysis::{
    classify, correlation, describe, detect_outliers, distribution, frequency_tables, missing_summary,
    monthly_counts,
};
use crate::domain::{AnalysisConfig, ColumnInfo, Schema, Table};
use crate::error::{AppError, StageError};
use crate::exec::{TaskOutcome, build_pool, run_column_tasks};
use crate::io::{
    CATEGORICAL_FILE, DESCRIBE_FILE, MISSING_FILE, load_table, normalize_decimal_commas, unique_stems,
    write_describe_csv, write_frequency_workbook, write_missing_csv, write_outlier_rows,
};
use crate::plot::{render_distribution, render_heatmap, render_time_series};

pub const HEATMAP_FILE: &str = "correlation_heatmap.png";

/// The seven report stages, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Describe,
    Distribution,
    Missing,
    Correlation,
    Outliers,
    Categorical,
    TimeSeries,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Describe => "descriptive statistics",
            Stage::Distribution => "distributions",
            Stage::Missing => "missing values",
            Stage::Correlation => "correlation",
            Stage::Outliers => "outliers",
            Stage::Categorical => "categorical analysis",
            Stage::TimeSeries => "time series",
        }
    }
}

/// A failure the run recovered from.
#[derive(Debug, Clone, PartialEq)]
pub struct StageFailure {
    pub stage: Stage,
    /// `None` for stage-wide failures (correlation).
    pub column: Option<String>,
    pub message: String,
}

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub n_rows: usize,
    pub schema: Schema,
    /// Columns converted from comma-decimal text.
    pub converted: Vec<String>,
    pub ragged_rows: usize,
    /// Files written, in the order they were produced.
    pub artifacts: Vec<PathBuf>,
    /// Outlier counts per column that produced a file.
    pub outlier_counts: Vec<(String, usize)>,
    /// Stages that had nothing to do.
    pub notices: Vec<String>,
    pub failures: Vec<StageFailure>,
}

impl RunOutput {
    fn fail(&mut self, stage: Stage, column: Option<&str>, err: &StageError) {
        match column {
            Some(column) => warn!(stage = stage.label(), column, error = %err, "column task failed"),
            None => warn!(stage = stage.label(), error = %err, "stage failed; continuing"),
        }
        self.failures.push(StageFailure {
            stage,
            column: column.map(str::to_string),
            message: err.to_string(),
        });
    }

    fn notice(&mut self, stage: Stage, message: impl Into<String>) {
        let message = message.into();
        info!(stage = stage.label(), "{message}");
        self.notices.push(message);
    }
}

/// Read-only inputs shared by every stage.
struct StageContext<'a> {
    table: &'a Table,
    schema: &'a Schema,
    out_dir: &'a Path,
    pool: &'a ThreadPool,
    /// File stem per column index, unique across the table.
    stems: Vec<String>,
}

impl StageContext<'_> {
    fn artifact(&self, info: &ColumnInfo, suffix: &str) -> PathBuf {
        self.out_dir.join(format!("{}_{suffix}", self.stems[info.index]))
    }
}

/// Execute the whole report for one input file.
pub fn run_analysis(config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    let loaded = load_table(&config.input_path, config.delimiter)?;
    let mut table = loaded.table;
    info!(
        path = %config.input_path.display(),
        rows = table.n_rows(),
        cols = table.n_cols(),
        "input loaded"
    );

    let converted = normalize_decimal_commas(&mut table);
    if !converted.is_empty() {
        info!(columns = ?converted, "comma-decimal columns converted");
    }
    let schema = classify(&table, &config.dates);
    let pool = build_pool(config.jobs)?;

    std::fs::create_dir_all(&config.output_dir).map_err(|e| {
        AppError::output(format!(
            "Failed to create output directory '{}': {e}",
            config.output_dir.display()
        ))
    })?;

    let mut run = RunOutput {
        input: config.input_path.clone(),
        output_dir: config.output_dir.clone(),
        n_rows: table.n_rows(),
        schema: schema.clone(),
        converted,
        ragged_rows: loaded.ragged_rows,
        artifacts: Vec::new(),
        outlier_counts: Vec::new(),
        notices: Vec::new(),
        failures: Vec::new(),
    };

    let ctx = StageContext {
        table: &table,
        schema: &schema,
        out_dir: &config.output_dir,
        pool: &pool,
        stems: unique_stems(table.column_names()),
    };
    run_stages(&ctx, &mut run)?;
    Ok(run)
}

fn run_stages(ctx: &StageContext<'_>, run: &mut RunOutput) -> Result<(), AppError> {
    describe_stage(ctx, run)?;
    distribution_stage(ctx, run);
    missing_stage(ctx, run)?;
    correlation_stage(ctx, run);
    outlier_stage(ctx, run);
    categorical_stage(ctx, run)?;
    time_series_stage(ctx, run);
    Ok(())
}

fn write_failed(path: &Path, err: StageError) -> AppError {
    AppError::output(format!("Failed to write '{}': {err}", path.display()))
}

fn describe_stage(ctx: &StageContext<'_>, run: &mut RunOutput) -> Result<(), AppError> {
    let path = ctx.out_dir.join(DESCRIBE_FILE);
    let rows = describe(ctx.table, ctx.schema);
    write_describe_csv(&path, &rows).map_err(|e| write_failed(&path, e))?;
    info!(path = %path.display(), "descriptive statistics saved");
    run.artifacts.push(path);
    Ok(())
}

/// Fold per-column outcomes into the run: successes become artifacts.
fn collect_files(run: &mut RunOutput, stage: Stage, outcomes: Vec<TaskOutcome<Option<PathBuf>>>) {
    for outcome in outcomes {
        match outcome.result {
            Ok(Some(path)) => run.artifacts.push(path),
            Ok(None) => {}
            Err(err) => run.fail(stage, Some(&outcome.column), &err),
        }
    }
}

fn distribution_stage(ctx: &StageContext<'_>, run: &mut RunOutput) {
    let columns: Vec<&ColumnInfo> = ctx.schema.numeric().collect();
    let outcomes = run_column_tasks(ctx.pool, &columns, |info| {
        let values = ctx.table.column(info.index).present_numbers();
        let Some(dist) = distribution(&info.name, &values) else {
            return Ok(None);
        };
        let path = ctx.artifact(info, "distribution.png");
        render_distribution(&path, &dist)?;
        info!(column = %info.name, path = %path.display(), "distribution plot saved");
        Ok(Some(path))
    });
    collect_files(run, Stage::Distribution, outcomes);
}

fn missing_stage(ctx: &StageContext<'_>, run: &mut RunOutput) -> Result<(), AppError> {
    let path = ctx.out_dir.join(MISSING_FILE);
    let rows = missing_summary(ctx.table);
    write_missing_csv(&path, &rows).map_err(|e| write_failed(&path, e))?;
    if rows.is_empty() {
        run.notice(Stage::Missing, "No missing values found.");
    }
    info!(path = %path.display(), columns = rows.len(), "missing value summary saved");
    run.artifacts.push(path);
    Ok(())
}

fn correlation_stage(ctx: &StageContext<'_>, run: &mut RunOutput) {
    let path = ctx.out_dir.join(HEATMAP_FILE);
    let attempt = catch_unwind(AssertUnwindSafe(|| {
        let corr = correlation(ctx.table, ctx.schema)?;
        render_heatmap(&path, &corr)
    }))
    .unwrap_or_else(|_| Err(StageError::Panicked("correlation heatmap rendering panicked".to_string())));

    match attempt {
        Ok(()) => {
            info!(path = %path.display(), "correlation heatmap saved");
            run.artifacts.push(path);
        }
        Err(err) => run.fail(Stage::Correlation, None, &err),
    }
}

fn outlier_stage(ctx: &StageContext<'_>, run: &mut RunOutput) {
    let columns: Vec<&ColumnInfo> = ctx.schema.numeric().collect();
    let outcomes = run_column_tasks(ctx.pool, &columns, |info| {
        let Some(values) = ctx.table.column(info.index).data.as_numeric() else {
            return Ok(None);
        };
        let Some(report) = detect_outliers(&info.name, values) else {
            return Ok(None);
        };
        if report.is_empty() {
            return Ok(None);
        }
        let path = ctx.artifact(info, "outliers.csv");
        write_outlier_rows(&path, ctx.table, &report)?;
        info!(
            column = %info.name,
            count = report.rows.len(),
            iqr = report.iqr(),
            path = %path.display(),
            "outliers saved"
        );
        Ok(Some((path, report.rows.len())))
    });

    for outcome in outcomes {
        match outcome.result {
            Ok(Some((path, count))) => {
                run.outlier_counts.push((outcome.column, count));
                run.artifacts.push(path);
            }
            Ok(None) => {}
            Err(err) => run.fail(Stage::Outliers, Some(&outcome.column), &err),
        }
    }
}

fn categorical_stage(ctx: &StageContext<'_>, run: &mut RunOutput) -> Result<(), AppError> {
    let tables = frequency_tables(ctx.table, ctx.schema);
    if tables.is_empty() {
        run.notice(Stage::Categorical, "No categorical columns found for analysis.");
        return Ok(());
    }
    let path = ctx.out_dir.join(CATEGORICAL_FILE);
    let sheets = write_frequency_workbook(&path, &tables).map_err(|e| write_failed(&path, e))?;
    info!(path = %path.display(), sheets = sheets.len(), "categorical analysis saved");
    run.artifacts.push(path);
    Ok(())
}

fn time_series_stage(ctx: &StageContext<'_>, run: &mut RunOutput) {
    let columns: Vec<&ColumnInfo> = ctx.schema.date_like().collect();
    if columns.is_empty() {
        run.notice(Stage::TimeSeries, "No date columns found for time series analysis.");
        return;
    }
    let outcomes = run_column_tasks(ctx.pool, &columns, |info| {
        let Some(format) = info.date_format else {
            return Err(StageError::plot(format!("column `{}` has no date layout", info.name)));
        };
        let Some(values) = ctx.table.column(info.index).data.as_text() else {
            return Ok(None);
        };
        let series = monthly_counts(&info.name, values, format);
        let path = ctx.artifact(info, "time_series.png");
        render_time_series(&path, &series)?;
        info!(
            column = %info.name,
            months = series.points.len(),
            unparsed = series.unparsed,
            path = %path.display(),
            "time series plot saved"
        );
        Ok(Some(path))
    });
    collect_files(run, Stage::TimeSeries, outcomes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ColumnKind, DateDetection};
    use crate::io::read_table;

    fn write_input(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    fn config(input: PathBuf, out: PathBuf) -> AnalysisConfig {
        let mut config = AnalysisConfig::new(input, out);
        config.jobs = Some(2);
        config
    }

    fn file_names(run: &RunOutput) -> Vec<String> {
        run.artifacts
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn three_row_table_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "in.csv", "value,label\n1,a\n2,b\n1000,a\n");
        let out = dir.path().join("report");

        let run = run_analysis(&config(input, out.clone())).unwrap();

        let stats = std::fs::read_to_string(out.join(DESCRIBE_FILE)).unwrap();
        assert!(stats.lines().nth(1).unwrap().starts_with("value,3,"));
        assert!(stats.lines().nth(2).unwrap().starts_with("label,3,2,a,2,"));
        assert!(out.join("value_distribution.png").exists());
        assert!(out.join(HEATMAP_FILE).exists());
        assert!(out.join(CATEGORICAL_FILE).exists());
        // Three points keep wide fences: q1 = 1.5, q3 = 501.
        assert!(!out.join("value_outliers.csv").exists());
        assert!(run.failures.is_empty(), "{:?}", run.failures);
    }

    #[test]
    fn extreme_value_is_extracted_with_its_row() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(
            dir.path(),
            "in.csv",
            "value,label\n1,a\n2,b\n3,c\n4,d\n1000,e\n",
        );
        let out = dir.path().join("out");

        let run = run_analysis(&config(input, out.clone())).unwrap();

        let extract = std::fs::read_to_string(out.join("value_outliers.csv")).unwrap();
        assert_eq!(extract, "value,label\n1000,e\n");
        assert_eq!(run.outlier_counts, [("value".to_string(), 1)]);
    }

    #[test]
    fn comma_decimals_are_analyzed_as_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "in.csv", "rate\n\"1,5\"\n\"2,3\"\n");
        let out = dir.path().join("out");

        let run = run_analysis(&config(input, out.clone())).unwrap();

        assert_eq!(run.converted, ["rate"]);
        assert_eq!(run.schema.columns[0].kind, ColumnKind::Numeric);
        assert!(out.join("rate_distribution.png").exists());
        assert!(run.notices.iter().any(|n| n.contains("categorical")));
    }

    #[test]
    fn no_numeric_columns_is_survivable() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "in.csv", "city,team\nOslo,red\n,blue\nLima,\n");
        let out = dir.path().join("out");

        let run = run_analysis(&config(input, out.clone())).unwrap();

        assert_eq!(run.failures.len(), 1);
        assert_eq!(run.failures[0].stage, Stage::Correlation);
        assert!(!out.join(HEATMAP_FILE).exists());
        assert!(out.join(CATEGORICAL_FILE).exists());
        let missing = std::fs::read_to_string(out.join(MISSING_FILE)).unwrap();
        assert_eq!(missing.lines().count(), 3);
    }

    #[test]
    fn nested_output_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "in.csv", "x\n1\n2\n");
        let out = dir.path().join("a").join("b").join("c");
        assert!(!out.exists());

        run_analysis(&config(input, out.clone())).unwrap();
        assert!(out.join(DESCRIBE_FILE).exists());
    }

    #[test]
    fn load_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let err = run_analysis(&config(dir.path().join("absent.csv"), out.clone())).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
        assert!(!out.exists());
    }

    #[test]
    fn date_columns_get_monthly_plots() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(
            dir.path(),
            "in.csv",
            "when,amount\n2024-01-03,1\n2024-01-20,2\n2024-03-09,3\n2024-03-10,4\n",
        );
        let out = dir.path().join("out");

        let run = run_analysis(&config(input, out.clone())).unwrap();

        assert_eq!(run.schema.columns[0].kind, ColumnKind::DateLike);
        assert!(out.join("when_time_series.png").exists());
        assert!(file_names(&run).contains(&"when_time_series.png".to_string()));
    }

    #[test]
    fn colliding_column_stems_do_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "in.csv", "a/b,a:b\n1,4\n2,5\n3,7\n");
        let out = dir.path().join("out");

        run_analysis(&config(input, out.clone())).unwrap();
        assert!(out.join("a_b_distribution.png").exists());
        assert!(out.join("a_b_2_distribution.png").exists());
    }

    #[test]
    fn stages_leave_the_table_untouched() {
        let text = "d1,d2,n,t\n2024-01-01,2023-05-05,1,x\n2024-02-01,2023-06-05,2,y\n2024-02-11,,3,z\n";
        let dir = tempfile::tempdir().unwrap();
        let pool = build_pool(Some(2)).unwrap();

        let table = read_table(text.as_bytes(), b',').unwrap().table;
        let before = table.clone();
        let schema = classify(&table, &DateDetection::default());
        assert_eq!(schema.count(ColumnKind::DateLike), 2);

        let ctx = StageContext {
            table: &table,
            schema: &schema,
            out_dir: dir.path(),
            pool: &pool,
            stems: unique_stems(table.column_names()),
        };
        let mut run = RunOutput {
            input: PathBuf::new(),
            output_dir: dir.path().to_path_buf(),
            n_rows: table.n_rows(),
            schema: schema.clone(),
            converted: Vec::new(),
            ragged_rows: 0,
            artifacts: Vec::new(),
            outlier_counts: Vec::new(),
            notices: Vec::new(),
            failures: Vec::new(),
        };
        run_stages(&ctx, &mut run).unwrap();

        assert_eq!(table, before);
        assert_eq!(table.column_names(), ["d1", "d2", "n", "t"]);
        assert!(dir.path().join("d1_time_series.png").exists());
        assert!(dir.path().join("d2_time_series.png").exists());
    }
}
