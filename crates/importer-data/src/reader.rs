//! Export-file reading and row tokenization.
//!
//! The tokenizer performs no semantic validation: it splits the raw text
//! into comma-delimited column rows and filters only what can never be a
//! data row (the header line and blank lines). Everything else is judged
//! downstream by the assembler.

use std::path::Path;

use importer_core::{ImportError, Result};
use tracing::debug;

/// One non-empty, non-header input line split into its raw columns.
///
/// Carries no guarantees beyond ordering; column-count and field checks
/// happen in the assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub columns: Vec<String>,
}

impl RawRow {
    /// Column at `index`, or `""` when the row is too short.
    ///
    /// Out-of-range access only happens for rows the assembler has
    /// already checked for minimum length, so the empty-string fallback
    /// simply coerces to absence downstream.
    pub fn column(&self, index: usize) -> &str {
        self.columns.get(index).map(String::as_str).unwrap_or("")
    }
}

/// Read the whole export file as text.
pub fn read_export_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ImportError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Split raw export text into data rows.
///
/// The first line is dropped unconditionally (header) along with any
/// line that is empty after trimming. Remaining lines are split on `,`
/// with no quoting or escaping support. Never raises; malformed rows are
/// filtered downstream.
pub fn tokenize_rows(contents: &str) -> Vec<RawRow> {
    let rows: Vec<RawRow> = contents
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| RawRow {
            columns: line.split(',').map(str::to_string).collect(),
        })
        .collect();

    debug!("Tokenized {} data rows", rows.len());
    rows
}
