//! A single interpreted page.

use crimetab_core::{Char, RawTable, StreamSettings, Word, WordExtractor, WordOptions};
use crimetab_parse::InterpretWarning;

/// Characters of one PDF page in top-left origin coordinates.
#[derive(Debug, Clone)]
pub struct Page {
    /// 0-based page index.
    page_number: usize,
    width: f64,
    height: f64,
    chars: Vec<Char>,
    warnings: Vec<InterpretWarning>,
}

impl Page {
    pub fn new(page_number: usize, width: f64, height: f64, chars: Vec<Char>) -> Self {
        Self {
            page_number,
            width,
            height,
            chars,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn with_warnings(mut self, warnings: Vec<InterpretWarning>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Returns the page index (0-based).
    pub fn page_number(&self) -> usize {
        self.page_number
    }

    /// The page-range label tables on this page carry: the 1-based number as text.
    pub fn label(&self) -> String {
        (self.page_number + 1).to_string()
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn chars(&self) -> &[Char] {
        &self.chars
    }

    /// Non-fatal problems met while interpreting the content stream.
    pub fn warnings(&self) -> &[InterpretWarning] {
        &self.warnings
    }

    pub fn extract_words(&self, options: &WordOptions) -> Vec<Word> {
        WordExtractor::extract(&self.chars, options)
    }

    /// Detect whitespace-separated tables, top to bottom.
    pub fn extract_tables(&self, settings: &StreamSettings) -> Vec<RawTable> {
        crimetab_core::find_stream_tables(&self.chars, settings, &self.label())
    }
}
