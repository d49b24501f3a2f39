use crate::app::pipeline::RunOutput;
use crate::domain::ColumnKind;

/// Format the end-of-run summary: dataset shape, column roles, artifacts and
/// anything the run recovered from.
pub fn format_run_summary(run: &RunOutput) -> String {
    let mut out = String::new();
    let schema = &run.schema;

    out.push_str("=== eda - exploratory data analysis report ===\n");
    out.push_str(&format!("Input:  {}\n", run.input.display()));
    out.push_str(&format!("Output: {}\n", run.output_dir.display()));
    out.push_str(&format!(
        "Rows: {} | columns: {} (numeric {}, text {}, date {}, empty {})\n",
        run.n_rows,
        schema.columns.len(),
        schema.count(ColumnKind::Numeric),
        schema.count(ColumnKind::Text),
        schema.count(ColumnKind::DateLike),
        schema.count(ColumnKind::Unknown),
    ));
    if !run.converted.is_empty() {
        out.push_str(&format!("Comma decimals converted: {}\n", run.converted.join(", ")));
    }
    if run.ragged_rows > 0 {
        out.push_str(&format!("Rows padded/truncated to the header width: {}\n", run.ragged_rows));
    }

    out.push_str(&format!("\nArtifacts ({}):\n", run.artifacts.len()));
    for path in &run.artifacts {
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        out.push_str(&format!("  {name}\n"));
    }

    if !run.outlier_counts.is_empty() {
        out.push_str("\nOutliers:\n");
        for (column, count) in &run.outlier_counts {
            out.push_str(&format!("  {column:<24} {count:>8}\n"));
        }
    }

    if !run.notices.is_empty() {
        out.push_str("\nNotes:\n");
        for notice in &run.notices {
            out.push_str(&format!("  {notice}\n"));
        }
    }

    if run.failures.is_empty() {
        out.push_str("\nAll stages completed.\n");
    } else {
        out.push_str(&format!("\nFailures ({}):\n", run.failures.len()));
        for f in &run.failures {
            match &f.column {
                Some(column) => out.push_str(&format!("  [{}] {column}: {}\n", f.stage.label(), f.message)),
                None => out.push_str(&format!("  [{}] {}\n", f.stage.label(), f.message)),
            }
        }
    }

    out
}
