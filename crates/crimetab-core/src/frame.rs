//! Labelled tables built from raw extracted grids.
//!
//! A [`Frame`] is a raw table whose header row has been found: it carries
//! column labels and the data rows beneath them.

use crate::error::TableError;
use crate::stream::RawTable;

/// Number of leading rows searched for a header.
pub const HEADER_SCAN_ROWS: usize = 5;

/// A row is a header when the fraction of its cells containing a letter
/// exceeds this value.
pub const HEADER_THRESHOLD: f64 = 0.6;

/// The row chosen as header and its letter-cell fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderMatch {
    /// 0-based row index, counted after empty rows were dropped.
    pub row: usize,
    pub ratio: f64,
}

/// A table with column labels; every row has one cell per column.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Frame {
    /// Create a frame, rejecting rows whose width differs from the label count.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, TableError> {
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != columns.len())
        {
            return Err(TableError::RaggedRow {
                row,
                expected: columns.len(),
                actual: cells.len(),
            });
        }
        Ok(Self { columns, rows })
    }

    /// Build a labelled frame from a raw table.
    ///
    /// Empty rows are dropped before the header search; empty columns only
    /// after it, so the letter ratio is taken over the full extracted width.
    /// Returns `None` when no header row is found among the first
    /// [`HEADER_SCAN_ROWS`] rows.
    pub fn from_raw(table: &RawTable) -> Option<(Frame, HeaderMatch)> {
        let rows = drop_empty_rows(&table.rows);
        let header = detect_header(&rows)?;

        let mut rows = drop_empty_columns(rows).into_iter().skip(header.row);
        let columns = rows
            .next()?
            .iter()
            .map(|label| clean_label(label))
            .collect();
        let frame = Frame {
            columns,
            rows: rows.collect(),
        };
        Some((frame, header))
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Whether any label or cell contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.columns.iter().any(|c| c.contains(needle))
            || self.rows.iter().flatten().any(|cell| cell.contains(needle))
    }
}

/// Remove rows and then columns in which every cell is empty.
pub fn drop_empty(rows: &[Vec<String>]) -> Vec<Vec<String>> {
    drop_empty_columns(drop_empty_rows(rows))
}

fn drop_empty_rows(rows: &[Vec<String>]) -> Vec<Vec<String>> {
    rows.iter()
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .cloned()
        .collect()
}

fn drop_empty_columns(rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let keep: Vec<usize> = (0..width)
        .filter(|&col| {
            rows.iter()
                .any(|row| row.get(col).is_some_and(|cell| !cell.is_empty()))
        })
        .collect();

    rows.iter()
        .map(|row| {
            keep.iter()
                .map(|&col| row.get(col).cloned().unwrap_or_default())
                .collect()
        })
        .collect()
}

/// Fraction of the `columns` cells of `row` that contain an ASCII letter.
pub fn letter_ratio(row: &[String], columns: usize) -> f64 {
    if columns == 0 {
        return 0.0;
    }
    let letters = row
        .iter()
        .filter(|cell| cell.chars().any(|c| c.is_ascii_alphabetic()))
        .count();
    letters as f64 / columns as f64
}

/// First row among the leading [`HEADER_SCAN_ROWS`] whose letter ratio
/// exceeds [`HEADER_THRESHOLD`].
pub fn detect_header(rows: &[Vec<String>]) -> Option<HeaderMatch> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    rows.iter()
        .take(HEADER_SCAN_ROWS)
        .enumerate()
        .map(|(row, cells)| HeaderMatch {
            row,
            ratio: letter_ratio(cells, columns),
        })
        .find(|m| m.ratio > HEADER_THRESHOLD)
}

fn clean_label(label: &str) -> String {
    label.trim().replace('\n', " ").trim().to_string()
}
