//! File-name stems and worksheet names derived from column names.

use std::collections::HashSet;

/// Excel's limit on worksheet name length.
pub const SHEET_NAME_MAX: usize = 31;

const SHEET_FORBIDDEN: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];
const FILE_RESERVED: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Make a column name safe to embed in a file name.
///
/// Reserved and control characters become `_`. A name that would be empty or
/// a relative path component (`.`, `..`) is replaced by `column`.
pub fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_control() || FILE_RESERVED.contains(&c) { '_' } else { c })
        .collect();
    let stem = stem.trim().to_string();
    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        "column".to_string()
    } else {
        stem
    }
}

/// Hands out unique file stems: later collisions get `_2`, `_3`, ….
#[derive(Debug, Default)]
pub struct StemAllocator {
    taken: HashSet<String>,
}

impl StemAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, name: &str) -> String {
        let base = file_stem(name);
        let mut candidate = base.clone();
        let mut n = 2;
        while !self.taken.insert(candidate.to_lowercase()) {
            candidate = format!("{base}_{n}");
            n += 1;
        }
        candidate
    }
}

/// Assign a unique stem to every name, in order.
pub fn unique_stems<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut alloc = StemAllocator::new();
    names.into_iter().map(|n| alloc.allocate(n)).collect()
}

/// Excel-valid worksheet name for a column, before de-duplication.
pub fn sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if SHEET_FORBIDDEN.contains(&c) { '_' } else { c })
        .collect();
    let truncated: String = cleaned.chars().take(SHEET_NAME_MAX).collect();
    // Excel rejects a leading or trailing apostrophe; truncation can expose one.
    truncated.trim_matches('\'').to_string()
}

/// Unique worksheet names for `names`, in order.
///
/// Excel compares sheet names case-insensitively, so collisions are checked
/// on the lowercased name. Suffixes (`~2`, `~3`, …) are fitted inside the
/// 31-character limit by shortening the base.
pub fn unique_sheet_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut taken = HashSet::new();
    let mut out = Vec::new();
    for (i, name) in names.into_iter().enumerate() {
        let mut base = sheet_name(name);
        if base.is_empty() {
            base = format!("Sheet{}", i + 1);
        }
        let mut candidate = base.clone();
        let mut n = 2;
        while !taken.insert(candidate.to_lowercase()) {
            let suffix = format!("~{n}");
            let keep = SHEET_NAME_MAX - suffix.chars().count();
            candidate = base.chars().take(keep).chain(suffix.chars()).collect();
            n += 1;
        }
        out.push(candidate);
    }
    out
}
