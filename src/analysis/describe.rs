//! Descriptive statistics, one row per column.
//!
//! Numeric columns get count/mean/std/min/quartiles/max; text and date-like
//! columns get count/unique/top/freq. Both live in one combined report.

use crate::analysis::categorical::value_counts;
use crate::domain::{ColumnKind, Schema, Table, format_number};
use crate::math::summarize;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescribeRow {
    pub column: String,
    pub count: usize,
    pub unique: Option<usize>,
    pub top: Option<String>,
    pub freq: Option<usize>,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

impl DescribeRow {
    pub const HEADER: [&'static str; 12] = [
        "column", "count", "unique", "top", "freq", "mean", "std", "min", "25%", "50%", "75%", "max",
    ];

    /// Cells in [`Self::HEADER`] order; absent statistics are empty.
    pub fn cells(&self) -> Vec<String> {
        let num = |v: Option<f64>| v.map(format_number).unwrap_or_default();
        let int = |v: Option<usize>| v.map(|n| n.to_string()).unwrap_or_default();
        vec![
            self.column.clone(),
            self.count.to_string(),
            int(self.unique),
            self.top.clone().unwrap_or_default(),
            int(self.freq),
            num(self.mean),
            num(self.std),
            num(self.min),
            num(self.q1),
            num(self.median),
            num(self.q3),
            num(self.max),
        ]
    }
}

pub fn describe(table: &Table, schema: &Schema) -> Vec<DescribeRow> {
    schema
        .columns
        .iter()
        .map(|info| {
            let column = table.column(info.index);
            let mut row = DescribeRow {
                column: info.name.clone(),
                count: column.data.len() - column.data.missing_count(),
                ..DescribeRow::default()
            };

            match info.kind {
                ColumnKind::Numeric => {
                    if let Some(s) = summarize(&column.present_numbers()) {
                        row.mean = Some(s.mean);
                        row.std = s.std;
                        row.min = Some(s.min);
                        row.q1 = Some(s.q1);
                        row.median = Some(s.median);
                        row.q3 = Some(s.q3);
                        row.max = Some(s.max);
                    }
                }
                ColumnKind::Text | ColumnKind::DateLike => {
                    if let Some(values) = column.data.as_text() {
                        let counts = value_counts(values);
                        row.unique = Some(counts.len());
                        if let Some((top, freq)) = counts.first() {
                            row.top = Some(top.clone());
                            row.freq = Some(*freq);
                        }
                    }
                }
                ColumnKind::Unknown => {}
            }

            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::classify::classify;
    use crate::domain::{Column, DateDetection};

    #[test]
    fn numeric_and_text_rows_share_one_report() {
        let table = Table::from_columns(vec![
            Column::numeric("n", vec![Some(1.0), Some(2.0), Some(1000.0)]),
            Column::text(
                "t",
                vec![Some("b".to_string()), Some("a".to_string()), Some("a".to_string())],
            ),
        ])
        .unwrap();
        let schema = classify(&table, &DateDetection::default());
        let rows = describe(&table, &schema);

        assert_eq!(rows[0].column, "n");
        assert_eq!(rows[0].count, 3);
        assert_eq!(rows[0].min, Some(1.0));
        assert_eq!(rows[0].median, Some(2.0));
        assert_eq!(rows[0].max, Some(1000.0));
        assert_eq!(rows[0].top, None);

        assert_eq!(rows[1].count, 3);
        assert_eq!(rows[1].unique, Some(2));
        assert_eq!(rows[1].top.as_deref(), Some("a"));
        assert_eq!(rows[1].freq, Some(2));
        assert_eq!(rows[1].mean, None);
    }

    #[test]
    fn all_missing_column_reports_zero_count() {
        let table = Table::from_columns(vec![Column::numeric("e", vec![None, None])]).unwrap();
        let schema = classify(&table, &DateDetection::default());
        let rows = describe(&table, &schema);
        assert_eq!(rows[0].count, 0);
        assert_eq!(rows[0].cells()[2..], vec![String::new(); 10][..]);
    }

    #[test]
    fn single_value_has_no_std() {
        let table = Table::from_columns(vec![Column::numeric("x", vec![Some(4.0), None])]).unwrap();
        let schema = classify(&table, &DateDetection::default());
        let row = &describe(&table, &schema)[0];
        assert_eq!(row.count, 1);
        assert_eq!(row.std, None);
        assert_eq!(row.cells()[6], "");
        assert_eq!(row.cells()[5], "4");
    }
}
