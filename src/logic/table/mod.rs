//! Table Layer - Delimited Text I/O
//!
//! In-memory rectangular table with the column handling the upload
//! pipeline needs: name normalization, duplicate detection, typed cell
//! access. Cells are stored as text; numeric parsing happens at access
//! time so one bad cell never aborts a whole upload.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum TableError {
    #[error("empty input: no header row")]
    Empty,

    #[error("row {row} has {got} fields, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("unterminated quoted field starting in row {row}")]
    UnterminatedQuote { row: usize },

    #[error("column has {got} values, expected {expected}")]
    ColumnLength { expected: usize, got: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

// ============================================================================
// TABLE
// ============================================================================

/// Rectangular table of text cells with named columns
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given column names
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Parse comma-separated text. The first record is the header.
    pub fn from_csv_str(text: &str) -> Result<Self, TableError> {
        let mut records = parse_csv(text)?;
        if records.is_empty() {
            return Err(TableError::Empty);
        }
        let columns = records.remove(0);
        let expected = columns.len();
        for (i, row) in records.iter().enumerate() {
            if row.len() != expected {
                return Err(TableError::Ragged {
                    row: i,
                    expected,
                    got: row.len(),
                });
            }
        }
        Ok(Self {
            columns,
            rows: records,
        })
    }

    /// Read and parse a CSV file
    pub fn from_csv_path(path: &Path) -> Result<Self, TableError> {
        let text = fs::read_to_string(path)?;
        Self::from_csv_str(&text)
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Index of a column by exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Names from `required` that are absent from this table
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|name| self.column_index(name).is_none())
            .map(|name| name.to_string())
            .collect()
    }

    /// Trim column names and replace internal spaces with underscores
    pub fn normalize_columns(&mut self) {
        for col in &mut self.columns {
            *col = col.trim().replace(' ', "_");
        }
    }

    /// Rename duplicate column names in place
    ///
    /// The first occurrence keeps its name; later ones get `.1`, `.2`, ...
    /// appended. Returns the names that were duplicated (pre-rename).
    pub fn dedup_columns(&mut self) -> Vec<String> {
        let mut duplicated = Vec::new();
        let mut renamed = self.columns.clone();
        for i in 0..renamed.len() {
            let seen_before = renamed[..i].iter().filter(|c| **c == self.columns[i]).count();
            if seen_before > 0 {
                duplicated.push(self.columns[i].clone());
                let mut suffix = seen_before;
                loop {
                    let candidate = format!("{}.{}", self.columns[i], suffix);
                    if !renamed.contains(&candidate) {
                        renamed[i] = candidate;
                        break;
                    }
                    suffix += 1;
                }
            }
        }
        self.columns = renamed;
        duplicated
    }

    /// Raw cell text
    pub fn cell(&self, row: usize, col: usize) -> &str {
        &self.rows[row][col]
    }

    /// Cell parsed as a finite number; empty, unparseable, and NaN cells
    /// all read as `None`
    pub fn number(&self, row: usize, col: usize) -> Option<f64> {
        let text = self.rows[row][col].trim();
        if text.is_empty() {
            return None;
        }
        match text.parse::<f64>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => None,
        }
    }

    /// Cell parsed as an integer (tolerates a trailing `.0` float form)
    pub fn integer(&self, row: usize, col: usize) -> Option<i32> {
        let text = self.rows[row][col].trim();
        if text.is_empty() {
            return None;
        }
        if let Ok(v) = text.parse::<i32>() {
            return Some(v);
        }
        match text.parse::<f64>() {
            Ok(v) if v.is_finite() && v.fract() == 0.0 => Some(v as i32),
            _ => None,
        }
    }

    /// Append a data row
    pub fn push_row(&mut self, row: Vec<String>) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::Ragged {
                row: self.rows.len(),
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Copy of a full data row
    pub fn row(&self, row: usize) -> Vec<String> {
        self.rows[row].clone()
    }

    /// Append a result column; `values` must cover every row
    pub fn add_column(&mut self, name: &str, values: Vec<String>) -> Result<(), TableError> {
        if values.len() != self.rows.len() {
            return Err(TableError::ColumnLength {
                expected: self.rows.len(),
                got: values.len(),
            });
        }
        self.columns.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }

    /// Serialize to comma-separated text with a trailing newline
    pub fn to_csv_string(&self) -> String {
        let mut out = String::new();
        write_record(&mut out, &self.columns);
        for row in &self.rows {
            write_record(&mut out, row);
        }
        out
    }

    /// Write the table as a CSV file
    pub fn write_csv_path(&self, path: &Path) -> Result<(), TableError> {
        fs::write(path, self.to_csv_string())?;
        Ok(())
    }
}

// ============================================================================
// CSV PARSING / WRITING
// ============================================================================

/// Minimal CSV reader: commas, CRLF or LF records, double-quoted fields
/// with `""` escapes.
fn parse_csv(text: &str) -> Result<Vec<Vec<String>>, TableError> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();
    let mut saw_any = false;

    while let Some(ch) = chars.next() {
        saw_any = true;
        if in_quotes {
            match ch {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(ch),
            }
            continue;
        }
        match ch {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(ch),
        }
    }

    if in_quotes {
        return Err(TableError::UnterminatedQuote { row: records.len() });
    }
    // Final record without a trailing newline
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    if !saw_any {
        return Err(TableError::Empty);
    }
    // Drop fully blank trailing lines
    records.retain(|r| !(r.len() == 1 && r[0].is_empty()));
    if records.is_empty() {
        return Err(TableError::Empty);
    }
    Ok(records)
}

fn write_record(out: &mut String, fields: &[String]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out.push('\n');
}

// ============================================================================
// TESTS
// ============================================================================
