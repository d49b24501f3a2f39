//! CSV ingest and normalization.
//!
//! This module turns a delimited text file into a typed, column-major
//! [`Table`]:
//!
//! - **Headers** are cleaned (BOM, whitespace), blanks are named and
//!   duplicates made unique.
//! - **Type inference** per column: numeric iff every non-missing value parses
//!   as a finite number (digit-group commas allowed in well-formed groups).
//! - **Comma-decimal normalization** ([`normalize_decimal_commas`]) converts
//!   text columns such as `"1,5"` to numbers, all-or-nothing per column.
//!
//! Load failures are fatal (exit code 2); nothing here writes output.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};

use crate::domain::{Column, ColumnData, Table};
use crate::error::AppError;

/// Tokens read as missing values (compared after trimming). Same set pandas
/// treats as NA by default.
const MISSING_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Ingest output: the typed table plus a few load diagnostics.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: Table,
    /// Rows whose field count differed from the header.
    pub ragged_rows: usize,
}

/// Open and parse a CSV file.
pub fn load_table(path: &Path, delimiter: u8) -> Result<LoadedTable, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_table(file, delimiter)
        .map_err(|e| AppError::input(format!("Failed to load CSV '{}': {}", path.display(), e.message())))
}

/// Parse CSV text from any reader.
pub fn read_table<R: Read>(reader: R, delimiter: u8) -> Result<LoadedTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();
    if headers.is_empty() {
        return Err(AppError::input("CSV has no header row."));
    }

    let names = clean_headers(headers.iter());
    let n_cols = names.len();
    let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); n_cols];
    let mut ragged_rows = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header line, lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::input(format!("CSV parse error at line {line}: {e}")))?;
        if record.len() != n_cols {
            ragged_rows += 1;
        }
        for (col, values) in raw.iter_mut().enumerate() {
            values.push(record.get(col).and_then(to_cell));
        }
    }

    if ragged_rows > 0 {
        warn!(ragged_rows, "rows with a field count different from the header were padded/truncated");
    }

    let columns: Vec<Column> = names
        .into_iter()
        .zip(raw)
        .map(|(name, values)| infer_column(name, values))
        .collect();

    let table = Table::from_columns(columns)?;
    debug!(rows = table.n_rows(), cols = table.n_cols(), "table loaded");
    Ok(LoadedTable { table, ragged_rows })
}

/// Convert comma-decimal text columns to numeric, in place.
///
/// A text column is a candidate when at least one non-missing value contains
/// `,`. Every `,` is read as a decimal point; if any non-missing value then
/// fails to parse, the column keeps its original text. Returns the names of
/// converted columns. Running this twice is the same as running it once.
pub fn normalize_decimal_commas(table: &mut Table) -> Vec<String> {
    let mut converted = Vec::new();

    for column in table.columns_mut() {
        let ColumnData::Text(values) = &column.data else {
            continue;
        };
        if !values.iter().flatten().any(|v| v.contains(',')) {
            continue;
        }

        let parsed: Option<Vec<Option<f64>>> = values
            .iter()
            .map(|cell| match cell {
                None => Some(None),
                Some(v) => parse_plain_number(&v.replace(',', ".")).map(Some),
            })
            .collect();

        match parsed {
            Some(numbers) => {
                debug!(column = %column.name, "comma-decimal column converted to numeric");
                column.data = ColumnData::Numeric(numbers);
                converted.push(column.name.clone());
            }
            None => {
                debug!(column = %column.name, "comma-decimal conversion failed; column stays text");
            }
        }
    }

    converted
}

fn clean_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for (idx, name) in raw.enumerate() {
        // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on
        // the first header.
        let name = name.trim().trim_start_matches('\u{feff}').trim();
        let base = if name.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            name.to_string()
        };

        let mut candidate = base.clone();
        let mut n = 1;
        while seen.contains(&candidate) {
            candidate = format!("{base}.{n}");
            n += 1;
        }
        seen.insert(candidate.clone());
        out.push(candidate);
    }

    out
}

fn to_cell(raw: &str) -> Option<String> {
    let s = raw.trim();
    if MISSING_TOKENS.contains(&s) {
        None
    } else {
        Some(s.to_string())
    }
}

fn infer_column(name: String, values: Vec<Option<String>>) -> Column {
    let numbers: Option<Vec<Option<f64>>> = values
        .iter()
        .map(|cell| match cell {
            None => Some(None),
            Some(v) => parse_grouped_number(v).map(Some),
        })
        .collect();

    match numbers {
        Some(numbers) => Column::numeric(name, numbers),
        None => Column::text(name, values),
    }
}

/// Parse a numeric literal that may carry `,` digit-group separators.
///
/// Groups must be well formed (`1,234`, `-12,345.5`); `1,5` is rejected so it
/// can be picked up later as a comma-decimal value.
pub fn parse_grouped_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if !s.contains(',') {
        return parse_plain_number(s);
    }

    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+' | b'-') => s.split_at(1),
        _ => ("", s),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };
    if frac_part.is_some_and(|f| f.contains(',')) {
        return None;
    }

    let mut groups = int_part.split(',');
    let first = groups.next()?;
    let is_digits = |g: &str| !g.is_empty() && g.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(first) || first.len() > 3 {
        return None;
    }

    let mut digits = String::from(sign);
    digits.push_str(first);
    for group in groups {
        if group.len() != 3 || !is_digits(group) {
            return None;
        }
        digits.push_str(group);
    }
    if let Some(frac) = frac_part {
        digits.push('.');
        digits.push_str(frac);
    }

    parse_plain_number(&digits)
}

fn parse_plain_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
