//! Untyped tabular dataset model.
//!
//! A [`Dataset`] is an immutable in-memory table: ordered header names plus
//! rows of string cells. No type coercion happens at load time — every cell
//! is a string, and rows may be shorter than the header list (ragged input).
//! Downstream analyses decide per-cell how to interpret or reject values.

use std::fs;
use std::io;
use std::path::Path;

use crate::xlsx;

/// Immutable string-valued table with ordered headers and ragged rows.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read-only view of one column, with the header index resolved once.
/// Cells beyond a ragged row's length read as the empty string.
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    index: usize,
    rows: &'a [Vec<String>],
}

impl<'a> Column<'a> {
    /// Cell at `row`, or `""` when the row is too short.
    pub fn get(&self, row: usize) -> &'a str {
        self.rows
            .get(row)
            .and_then(|r| r.get(self.index))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Iterate all cells in row order, empty string for missing cells.
    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        (0..self.rows.len()).map(|i| self.get(i))
    }
}

impl Dataset {
    /// Build a dataset from already-split headers and rows.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Load a CSV file. The first record is the header row.
    pub fn from_csv(path: impl AsRef<Path>) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::from_csv_str(&text))
    }

    /// Parse CSV text (RFC 4180 quoting, CRLF or LF, optional BOM).
    pub fn from_csv_str(text: &str) -> Self {
        let mut records = parse_csv(text);
        if records.is_empty() {
            return Self::default();
        }
        let headers = records.remove(0);
        Self::new(headers, records)
    }

    /// Load the first worksheet of an XLSX workbook.
    pub fn from_xlsx(path: impl AsRef<Path>) -> io::Result<Self> {
        let mut grid = xlsx::read_grid(path.as_ref())?;
        if grid.is_empty() {
            return Ok(Self::default());
        }
        let headers = grid.remove(0);
        Ok(Self::new(headers, grid))
    }

    /// Load a dataset, dispatching on the file extension (`.xlsx` vs CSV).
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let is_xlsx = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"));
        if is_xlsx {
            Self::from_xlsx(path)
        } else {
            Self::from_csv(path)
        }
    }

    /// Index of a header, if present.
    pub fn header_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Column view by header name. The index lookup happens here, once.
    pub fn column(&self, name: &str) -> Option<Column<'_>> {
        self.header_index(name).map(|index| Column {
            index,
            rows: &self.rows,
        })
    }

    /// Number of data rows (header excluded).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Split CSV text into records. Handles quoted fields, doubled-quote
/// escapes, embedded newlines inside quotes, and a leading UTF-8 BOM.
/// Blank lines are dropped.
fn parse_csv(input: &str) -> Vec<Vec<String>> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut records: Vec<Vec<String>> = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                record.push(std::mem::take(&mut field));
                if !(record.len() == 1 && record[0].is_empty()) {
                    records.push(std::mem::take(&mut record));
                } else {
                    record.clear();
                }
            }
            _ => field.push(c),
        }
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn csv_basic() {
        let ds = Dataset::from_csv_str("a,b,c\n1,2,3\n4,5,6\n");
        assert_eq!(ds.headers, vec!["a", "b", "c"]);
        assert_eq!(ds.rows.len(), 2);
        assert_eq!(ds.rows[1], vec!["4", "5", "6"]);
    }

    #[test]
    fn csv_quoting_and_crlf() {
        let ds = Dataset::from_csv_str("name,note\r\n\"Smith, J\",\"said \"\"hi\"\"\"\r\n\"multi\nline\",x\r\n");
        assert_eq!(ds.headers, vec!["name", "note"]);
        assert_eq!(ds.rows[0], vec!["Smith, J", "said \"hi\""]);
        assert_eq!(ds.rows[1], vec!["multi\nline", "x"]);
    }

    #[test]
    fn csv_ragged_rows_read_as_empty() {
        let ds = Dataset::from_csv_str("a,b,c\n1\n1,2,3\n");
        let col = ds.column("c").unwrap();
        assert_eq!(col.get(0), "");
        assert_eq!(col.get(1), "3");
        // Out-of-range row index is also empty.
        assert_eq!(col.get(99), "");
    }

    #[test]
    fn csv_bom_and_blank_lines() {
        let ds = Dataset::from_csv_str("\u{feff}a,b\n\n1,2\n\n");
        assert_eq!(ds.headers, vec!["a", "b"]);
        assert_eq!(ds.rows, vec![vec!["1", "2"]]);
    }

    #[test]
    fn csv_empty_input() {
        let ds = Dataset::from_csv_str("");
        assert!(ds.headers.is_empty());
        assert_eq!(ds.row_count(), 0);
    }

    #[test]
    fn column_missing_header() {
        let ds = Dataset::from_csv_str("a\n1\n");
        assert!(ds.column("b").is_none());
        assert_eq!(ds.header_index("a"), Some(0));
    }

    #[test]
    fn from_csv_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "x,y\n1,2\n").unwrap();
        let ds = Dataset::from_csv(f.path()).unwrap();
        assert_eq!(ds.headers, vec!["x", "y"]);
        assert_eq!(ds.rows, vec![vec!["1", "2"]]);
    }
}
