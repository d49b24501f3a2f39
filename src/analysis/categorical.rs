//! Value frequency tables for non-numeric columns.

use std::collections::HashMap;

use crate::domain::{Schema, Table};

/// Frequency table of one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    pub column: String,
    /// `(value, count)` by count descending, ties by first occurrence.
    pub counts: Vec<(String, usize)>,
}

/// Count non-missing values; most frequent first, ties by first occurrence.
pub fn value_counts(values: &[Option<String>]) -> Vec<(String, usize)> {
    // value -> (count, first row)
    let mut seen: HashMap<&str, (usize, usize)> = HashMap::new();
    for (row, value) in values.iter().enumerate() {
        if let Some(v) = value {
            seen.entry(v.as_str()).or_insert((0, row)).0 += 1;
        }
    }

    let mut counts: Vec<(&str, usize, usize)> = seen
        .into_iter()
        .map(|(value, (count, first))| (value, count, first))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    counts
        .into_iter()
        .map(|(value, count, _)| (value.to_string(), count))
        .collect()
}

/// Frequency tables for every `Text` and `DateLike` column, in table order.
pub fn frequency_tables(table: &Table, schema: &Schema) -> Vec<FrequencyTable> {
    schema
        .non_numeric()
        .filter_map(|info| {
            let values = table.column(info.index).data.as_text()?;
            Some(FrequencyTable {
                column: info.name.clone(),
                counts: value_counts(values),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(raw: &[Option<&str>]) -> Vec<Option<String>> {
        raw.iter().map(|v| v.map(str::to_string)).collect()
    }

    #[test]
    fn orders_by_count_then_first_occurrence() {
        let v = values(&[Some("b"), Some("a"), None, Some("c"), Some("a"), Some("c"), Some("d")]);
        let counts = value_counts(&v);
        assert_eq!(
            counts,
            vec![
                ("a".to_string(), 2),
                ("c".to_string(), 2),
                ("b".to_string(), 1),
                ("d".to_string(), 1),
            ]
        );
    }

    #[test]
    fn missing_values_are_not_counted() {
        assert!(value_counts(&values(&[None, None])).is_empty());
    }
}
