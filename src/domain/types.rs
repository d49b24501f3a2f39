//! Shared domain types.
//!
//! - the column-major [`Table`] produced by ingest
//! - the per-column classification ([`ColumnKind`], [`Schema`], [`DateFormat`])
//! - run configuration ([`AnalysisConfig`], [`DateDetection`])

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::AppError;

/// Typed payload of one column. `None` is a missing value.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_missing(&self, row: usize) -> bool {
        match self {
            ColumnData::Numeric(v) => v.get(row).is_none_or(Option::is_none),
            ColumnData::Text(v) => v.get(row).is_none_or(Option::is_none),
        }
    }

    pub fn missing_count(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::Text(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }

    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match self {
            ColumnData::Numeric(v) => Some(v),
            ColumnData::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&[Option<String>]> {
        match self {
            ColumnData::Text(v) => Some(v),
            ColumnData::Numeric(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Text(values),
        }
    }

    /// Non-missing numeric values in row order (empty for text columns).
    pub fn present_numbers(&self) -> Vec<f64> {
        match &self.data {
            ColumnData::Numeric(v) => v.iter().flatten().copied().collect(),
            ColumnData::Text(_) => Vec::new(),
        }
    }

    /// Render one cell the way it is written to CSV outputs.
    pub fn display_cell(&self, row: usize) -> String {
        match &self.data {
            ColumnData::Numeric(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(format_number)
                .unwrap_or_default(),
            ColumnData::Text(v) => v.get(row).cloned().flatten().unwrap_or_default(),
        }
    }
}

/// In-memory source table, column-major, rows in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Build a table; every column must have the same length.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, AppError> {
        let n_rows = columns.first().map(|c| c.data.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.data.len() != n_rows) {
            return Err(AppError::input(format!(
                "Column `{}` has {} rows, expected {n_rows}.",
                bad.name,
                bad.data.len()
            )));
        }
        Ok(Self { columns, n_rows })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, idx: usize) -> &Column {
        &self.columns[idx]
    }

    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Column payloads can be replaced (normalization) but never resized.
    pub(crate) fn columns_mut(&mut self) -> impl Iterator<Item = &mut Column> {
        self.columns.iter_mut()
    }

    /// One full row rendered for CSV output.
    pub fn row_cells(&self, row: usize) -> Vec<String> {
        self.columns.iter().map(|c| c.display_cell(row)).collect()
    }
}

/// Format a number for tabular output: integral values without a fraction,
/// everything else with the shortest round-trip representation.
pub fn format_number(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

/// Role of a column for every analysis stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Numeric,
    Text,
    DateLike,
    /// No non-missing value at all.
    Unknown,
}

impl ColumnKind {
    pub fn label(self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Text => "text",
            ColumnKind::DateLike => "date",
            ColumnKind::Unknown => "unknown",
        }
    }

    pub fn is_non_numeric(self) -> bool {
        matches!(self, ColumnKind::Text | ColumnKind::DateLike)
    }
}

/// A date or date-time layout accepted by date detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateFormat {
    Date(&'static str),
    DateTime(&'static str),
    Rfc3339,
}

impl DateFormat {
    /// Every supported layout, in detection priority order.
    pub const ALL: [DateFormat; 11] = [
        DateFormat::Date("%Y-%m-%d"),
        DateFormat::DateTime("%Y-%m-%d %H:%M:%S"),
        DateFormat::DateTime("%Y-%m-%dT%H:%M:%S"),
        DateFormat::DateTime("%Y-%m-%dT%H:%M:%S%.f"),
        DateFormat::DateTime("%Y-%m-%d %H:%M"),
        DateFormat::Rfc3339,
        DateFormat::Date("%Y/%m/%d"),
        DateFormat::Date("%m/%d/%Y"),
        DateFormat::Date("%d/%m/%Y"),
        DateFormat::Date("%d-%m-%Y"),
        DateFormat::Date("%d.%m.%Y"),
    ];

    pub fn parse(self, s: &str) -> Option<NaiveDateTime> {
        match self {
            DateFormat::Date(fmt) => NaiveDate::parse_from_str(s, fmt)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0)),
            DateFormat::DateTime(fmt) => NaiveDateTime::parse_from_str(s, fmt).ok(),
            DateFormat::Rfc3339 => DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc()),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DateFormat::Date(fmt) | DateFormat::DateTime(fmt) => fmt,
            DateFormat::Rfc3339 => "rfc3339",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Position in the table.
    pub index: usize,
    pub name: String,
    pub kind: ColumnKind,
    /// Layout that matched, for `DateLike` columns.
    pub date_format: Option<DateFormat>,
}

/// Classification of every column, computed once after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub columns: Vec<ColumnInfo>,
}

impl Schema {
    pub fn kind_of(&self, index: usize) -> Option<ColumnKind> {
        self.columns.get(index).map(|c| c.kind)
    }

    pub fn numeric(&self) -> impl Iterator<Item = &ColumnInfo> {
        self.columns.iter().filter(|c| c.kind == ColumnKind::Numeric)
    }

    pub fn non_numeric(&self) -> impl Iterator<Item = &ColumnInfo> {
        self.columns.iter().filter(|c| c.kind.is_non_numeric())
    }

    pub fn date_like(&self) -> impl Iterator<Item = &ColumnInfo> {
        self.columns.iter().filter(|c| c.kind == ColumnKind::DateLike)
    }

    pub fn count(&self, kind: ColumnKind) -> usize {
        self.columns.iter().filter(|c| c.kind == kind).count()
    }
}

/// Date-column detection rule.
#[derive(Debug, Clone, PartialEq)]
pub struct DateDetection {
    /// Minimum share of non-missing values that must parse with one format.
    pub threshold: f64,
    /// Text columns always treated as date-like.
    pub force: Vec<String>,
    /// Columns never treated as date-like.
    pub ignore: Vec<String>,
}

impl Default for DateDetection {
    fn default() -> Self {
        Self {
            threshold: 0.9,
            force: Vec::new(),
            ignore: Vec::new(),
        }
    }
}

/// Resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub delimiter: u8,
    /// Worker-pool size for the parallel stages (`None` = available CPUs).
    pub jobs: Option<usize>,
    pub dates: DateDetection,
}

impl AnalysisConfig {
    pub fn new(input_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_dir: output_dir.into(),
            delimiter: b',',
            jobs: None,
            dates: DateDetection::default(),
        }
    }
}
