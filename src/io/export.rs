//! CSV artifacts: descriptive statistics, missing values, outlier rows.
//!
//! Every writer creates (or truncates) its file and writes a header even when
//! there are no data rows.

use std::path::Path;

use crate::analysis::{DescribeRow, MissingRow, OutlierReport};
use crate::domain::Table;
use crate::error::StageError;

pub const DESCRIBE_FILE: &str = "descriptive_stats.csv";
pub const MISSING_FILE: &str = "missing_values_summary.csv";

pub fn write_describe_csv(path: &Path, rows: &[DescribeRow]) -> Result<(), StageError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(DescribeRow::HEADER)?;
    for row in rows {
        writer.write_record(row.cells())?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_missing_csv(path: &Path, rows: &[MissingRow]) -> Result<(), StageError> {
    // serde only emits a header together with the first row.
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(["column", "missing_values", "percentage"])?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the flagged rows of `report`, every column, in file order.
pub fn write_outlier_rows(path: &Path, table: &Table, report: &OutlierReport) -> Result<(), StageError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(table.column_names())?;
    for &row in &report.rows {
        writer.write_record(table.row_cells(row))?;
    }
    writer.flush()?;
    Ok(())
}
