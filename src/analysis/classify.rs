//! Column classification.
//!
//! Runs once, after normalization, and tags every column as `Numeric`,
//! `Text`, `DateLike` or `Unknown`. Every stage receives the resulting
//! [`Schema`] instead of re-deriving column types itself.
//!
//! Date detection is deliberately strict: a text column only becomes
//! `DateLike` when one single layout parses at least `threshold` of its
//! non-missing values (values shorter than [`MIN_DATE_LEN`] never count).
//! Users can force or exclude columns by name.

use tracing::{debug, warn};

use crate::domain::{ColumnData, ColumnInfo, ColumnKind, DateDetection, DateFormat, Schema, Table};

/// Shorter strings are never read as dates.
pub const MIN_DATE_LEN: usize = 6;

pub fn classify(table: &Table, rule: &DateDetection) -> Schema {
    for name in rule.force.iter().chain(&rule.ignore) {
        if table.column_by_name(name).is_none() {
            warn!(column = %name, "date column override names an unknown column");
        }
    }

    let columns = table
        .columns()
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let (kind, date_format) = match &column.data {
                ColumnData::Numeric(values) => {
                    if values.iter().all(Option::is_none) {
                        (ColumnKind::Unknown, None)
                    } else {
                        if rule.force.contains(&column.name) {
                            warn!(column = %column.name, "numeric column cannot be forced to a date column");
                        }
                        (ColumnKind::Numeric, None)
                    }
                }
                ColumnData::Text(values) => classify_text(&column.name, values, rule),
            };
            debug!(column = %column.name, kind = kind.label(), "column classified");
            ColumnInfo {
                index,
                name: column.name.clone(),
                kind,
                date_format,
            }
        })
        .collect();

    Schema { columns }
}

fn classify_text(
    name: &str,
    values: &[Option<String>],
    rule: &DateDetection,
) -> (ColumnKind, Option<DateFormat>) {
    if values.iter().all(Option::is_none) {
        return (ColumnKind::Unknown, None);
    }
    if rule.ignore.iter().any(|n| n == name) {
        return (ColumnKind::Text, None);
    }

    let forced = rule.force.iter().any(|n| n == name);
    match best_date_format(values) {
        Some((format, ratio)) if forced || ratio >= rule.threshold => (ColumnKind::DateLike, Some(format)),
        None if forced => {
            warn!(column = %name, "forced date column has no parseable dates; treating it as text");
            (ColumnKind::Text, None)
        }
        _ => (ColumnKind::Text, None),
    }
}

/// The layout that parses the most non-missing values, with its success ratio.
///
/// Returns `None` when no layout parses any value.
pub fn best_date_format(values: &[Option<String>]) -> Option<(DateFormat, f64)> {
    let present: Vec<&str> = values.iter().flatten().map(String::as_str).collect();
    if present.is_empty() {
        return None;
    }

    let mut best: Option<(DateFormat, usize)> = None;
    for format in DateFormat::ALL {
        let hits = present
            .iter()
            .filter(|v| v.len() >= MIN_DATE_LEN && format.parse(v).is_some())
            .count();
        // Strictly greater keeps the earlier (higher priority) layout on ties.
        if hits > 0 && best.is_none_or(|(_, h)| hits > h) {
            best = Some((format, hits));
        }
    }

    best.map(|(format, hits)| (format, hits as f64 / present.len() as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Column;

    fn text(values: &[&str]) -> Vec<Option<String>> {
        values
            .iter()
            .map(|v| if v.is_empty() { None } else { Some(v.to_string()) })
            .collect()
    }

    fn table() -> Table {
        Table::from_columns(vec![
            Column::numeric("amount", vec![Some(1.0), Some(2.0), None]),
            Column::text("city", text(&["Lima", "Quito", "Lima"])),
            Column::text("when", text(&["2024-01-05", "2024-02-11", ""])),
            Column::numeric("empty", vec![None, None, None]),
            Column::text("mixed", text(&["2024-01-05", "soon", "later"])),
        ])
        .unwrap()
    }

    #[test]
    fn classifies_each_role() {
        let schema = classify(&table(), &DateDetection::default());
        let kinds: Vec<ColumnKind> = schema.columns.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnKind::Numeric,
                ColumnKind::Text,
                ColumnKind::DateLike,
                ColumnKind::Unknown,
                ColumnKind::Text,
            ]
        );
        assert_eq!(schema.columns[2].date_format, Some(DateFormat::Date("%Y-%m-%d")));
        assert_eq!(schema.numeric().count(), 1);
        assert_eq!(schema.non_numeric().count(), 3);
    }

    #[test]
    fn ignore_and_force_override_detection() {
        let rule = DateDetection {
            threshold: 0.9,
            force: vec!["mixed".to_string()],
            ignore: vec!["when".to_string()],
        };
        let schema = classify(&table(), &rule);
        assert_eq!(schema.kind_of(2), Some(ColumnKind::Text));
        assert_eq!(schema.kind_of(4), Some(ColumnKind::DateLike));
    }

    #[test]
    fn forcing_a_column_without_dates_keeps_it_text() {
        let rule = DateDetection {
            force: vec!["city".to_string()],
            ..DateDetection::default()
        };
        let schema = classify(&table(), &rule);
        assert_eq!(schema.kind_of(1), Some(ColumnKind::Text));
    }

    #[test]
    fn threshold_controls_detection() {
        let values = text(&["2024-01-05", "2024-02-05", "2024-03-05", "n/a-ish"]);
        let (_, ratio) = best_date_format(&values).unwrap();
        assert!((ratio - 0.75).abs() < 1e-12);

        let t = Table::from_columns(vec![Column::text("d", values)]).unwrap();
        let strict = classify(&t, &DateDetection::default());
        assert_eq!(strict.kind_of(0), Some(ColumnKind::Text));
        let lenient = classify(
            &t,
            &DateDetection {
                threshold: 0.7,
                ..DateDetection::default()
            },
        );
        assert_eq!(lenient.kind_of(0), Some(ColumnKind::DateLike));
    }

    #[test]
    fn day_first_and_datetime_layouts() {
        let dmy = text(&["31/01/2024", "15/02/2024"]);
        assert_eq!(best_date_format(&dmy).unwrap().0, DateFormat::Date("%d/%m/%Y"));

        let dt = text(&["2024-01-05 10:30:00", "2024-01-06 11:00:00"]);
        assert_eq!(
            best_date_format(&dt).unwrap().0,
            DateFormat::DateTime("%Y-%m-%d %H:%M:%S")
        );
    }

    #[test]
    fn short_codes_are_not_dates() {
        assert!(best_date_format(&text(&["1/2/3", "A-1", "x"])).is_none());
    }
}
