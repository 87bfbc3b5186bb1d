//! Error types for crimetab.
//!
//! Provides [`PdfError`] for fatal errors raised while reading a PDF and
//! [`TableError`] for errors raised while cleaning or reshaping a table.

use std::fmt;

/// Errors that stop a PDF from being read.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfError {
    /// Broken document structure or object syntax.
    ParseError(String),
    /// The file could not be read.
    IoError(String),
    /// A content stream could not be decoded.
    InterpreterError(String),
    /// Encrypted documents are not supported.
    PasswordRequired,
    Other(String),
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::ParseError(msg) => write!(f, "parse error: {msg}"),
            PdfError::IoError(msg) => write!(f, "I/O error: {msg}"),
            PdfError::InterpreterError(msg) => write!(f, "interpreter error: {msg}"),
            PdfError::PasswordRequired => write!(f, "PDF is encrypted and requires a password"),
            PdfError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PdfError {}

impl From<std::io::Error> for PdfError {
    fn from(err: std::io::Error) -> Self {
        PdfError::IoError(err.to_string())
    }
}

/// Errors raised while cleaning or reshaping a table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableError {
    /// A required column is not present.
    MissingColumn(String),
    /// A row's cell count does not match the column count.
    RaggedRow {
        /// 0-based row index.
        row: usize,
        expected: usize,
        actual: usize,
    },
    /// The same (state, crime, stat) combination appeared more than once.
    DuplicateEntry {
        state: String,
        crime: String,
        stat: String,
    },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::MissingColumn(name) => write!(f, "column '{name}' not found"),
            TableError::RaggedRow {
                row,
                expected,
                actual,
            } => write!(
                f,
                "row {row} has {actual} cells, expected {expected}"
            ),
            TableError::DuplicateEntry { state, crime, stat } => write!(
                f,
                "index contains duplicate entries, cannot reshape: ({state}, {crime}, {stat})"
            ),
        }
    }
}

impl std::error::Error for TableError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_error_display() {
        assert_eq!(
            PdfError::ParseError("bad xref".to_string()).to_string(),
            "parse error: bad xref"
        );
        assert_eq!(
            PdfError::PasswordRequired.to_string(),
            "PDF is encrypted and requires a password"
        );
    }

    #[test]
    fn pdf_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: PdfError = io_err.into();
        assert!(matches!(err, PdfError::IoError(_)));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn table_error_display_duplicate() {
        let err = TableError::DuplicateEntry {
            state: "Bihar".to_string(),
            crime: "Murder".to_string(),
            stat: "I".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "index contains duplicate entries, cannot reshape: (Bihar, Murder, I)"
        );
    }

    #[test]
    fn table_error_implements_std_error() {
        let err: Box<dyn std::error::Error> =
            Box::new(TableError::MissingColumn("State/UT".to_string()));
        assert_eq!(err.to_string(), "column 'State/UT' not found");
    }
}
