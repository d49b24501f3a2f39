//! Monthly resampling of date-like columns.
//!
//! The resampling is a derived, read-only view: dates are parsed from the
//! column and bucketed by calendar month. The table itself is never
//! reindexed or reordered.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::domain::DateFormat;

/// Record counts per calendar month, labelled by month end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyCounts {
    pub column: String,
    pub points: Vec<(NaiveDate, usize)>,
    /// Non-missing values that did not parse with the column's layout.
    pub unparsed: usize,
}

impl MonthlyCounts {
    pub fn max_count(&self) -> usize {
        self.points.iter().map(|(_, c)| *c).max().unwrap_or(0)
    }
}

/// Bucket parsed dates by month; months without records between the first
/// and last one are filled with zero.
pub fn monthly_counts(column: &str, values: &[Option<String>], format: DateFormat) -> MonthlyCounts {
    let mut buckets: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    let mut unparsed = 0usize;

    for value in values.iter().flatten() {
        match format.parse(value) {
            Some(dt) => *buckets.entry((dt.year(), dt.month())).or_insert(0) += 1,
            None => unparsed += 1,
        }
    }

    let mut points = Vec::new();
    if let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) {
        let mut ym = first;
        while ym <= last {
            let count = buckets.get(&ym).copied().unwrap_or(0);
            if let Some(end) = month_end(ym.0, ym.1) {
                points.push((end, count));
            }
            ym = next_month(ym);
        }
    }

    MonthlyCounts {
        column: column.to_string(),
        points,
        unparsed,
    }
}

fn next_month((year, month): (i32, u32)) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (ny, nm) = next_month((year, month));
    NaiveDate::from_ymd_opt(ny, nm, 1)?.pred_opt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(raw: &[&str]) -> Vec<Option<String>> {
        raw.iter()
            .map(|v| if v.is_empty() { None } else { Some(v.to_string()) })
            .collect()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn buckets_by_month_and_fills_gaps() {
        let v = values(&["2023-11-03", "2023-11-28", "", "2024-02-01", "bad-date"]);
        let m = monthly_counts("when", &v, DateFormat::Date("%Y-%m-%d"));
        assert_eq!(
            m.points,
            vec![
                (d(2023, 11, 30), 2),
                (d(2023, 12, 31), 0),
                (d(2024, 1, 31), 0),
                (d(2024, 2, 29), 1),
            ]
        );
        assert_eq!(m.unparsed, 1);
        assert_eq!(m.max_count(), 2);
    }

    #[test]
    fn unsorted_input_is_ordered_by_date() {
        let v = values(&["05/03/2024", "01/01/2024"]);
        let m = monthly_counts("d", &v, DateFormat::Date("%d/%m/%Y"));
        assert_eq!(m.points.first().map(|p| p.0), Some(d(2024, 1, 31)));
        assert_eq!(m.points.last().map(|p| p.0), Some(d(2024, 3, 31)));
        assert_eq!(m.points.len(), 3);
    }

    #[test]
    fn no_parseable_values_gives_empty_series() {
        let m = monthly_counts("d", &values(&["x", ""]), DateFormat::Rfc3339);
        assert!(m.points.is_empty());
        assert_eq!(m.max_count(), 0);
    }
}
