//! Categorical frequency workbook.

use std::path::Path;

use rust_xlsxwriter::Workbook;

use crate::analysis::FrequencyTable;
use crate::error::StageError;
use crate::io::names::unique_sheet_names;

pub const CATEGORICAL_FILE: &str = "categorical_analysis.xlsx";

/// Write one sheet per frequency table and return the sheet names used.
///
/// Each sheet has a header row `[<column>, count]` followed by one row per
/// distinct value, most frequent first.
pub fn write_frequency_workbook(path: &Path, tables: &[FrequencyTable]) -> Result<Vec<String>, StageError> {
    let names = unique_sheet_names(tables.iter().map(|t| t.column.as_str()));
    let mut workbook = Workbook::new();

    for (table, name) in tables.iter().zip(&names) {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name)?;
        sheet.write_string(0, 0, &table.column)?;
        sheet.write_string(0, 1, "count")?;
        for (row, (value, count)) in (1u32..).zip(&table.counts) {
            sheet.write_string(row, 0, value)?;
            sheet.write_number(row, 1, *count as f64)?;
        }
    }

    workbook.save(path)?;
    Ok(names)
}
