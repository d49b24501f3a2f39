//! Missing-value summary.

use serde::Serialize;

use crate::domain::Table;

/// One column with at least one missing value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingRow {
    pub column: String,
    pub missing_values: usize,
    /// `100 × missing / total rows`.
    pub percentage: f64,
}

/// Columns with a non-zero null count, in table order.
pub fn missing_summary(table: &Table) -> Vec<MissingRow> {
    let n_rows = table.n_rows();
    table
        .columns()
        .iter()
        .filter_map(|column| {
            let missing = column.data.missing_count();
            (missing > 0).then(|| MissingRow {
                column: column.name.clone(),
                missing_values: missing,
                percentage: 100.0 * missing as f64 / n_rows as f64,
            })
        })
        .collect()
}
