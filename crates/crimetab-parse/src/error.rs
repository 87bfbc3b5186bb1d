//! Errors raised by the lopdf backend and the content interpreter.

use crimetab_core::PdfError;
use thiserror::Error;

/// Failure inside the parsing layer; folds into [`PdfError`] at the facade.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Document structure could not be read or resolved.
    #[error("PDF parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A page's content stream could not be decoded into operations.
    #[error("interpreter error: {0}")]
    Interpreter(String),

    #[error(transparent)]
    Core(#[from] PdfError),
}

impl From<BackendError> for PdfError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => PdfError::ParseError(msg),
            BackendError::Io(e) => PdfError::IoError(e.to_string()),
            BackendError::Interpreter(msg) => PdfError::InterpreterError(msg),
            BackendError::Core(e) => e,
        }
    }
}
