//! Callback trait between the content stream interpreter and char extraction.
//!
//! The interpreter calls [`ContentHandler`] methods for every glyph it shows
//! and for every recoverable problem it steps over.

/// A glyph shown by `Tj`, `TJ`, `'` or `"`, with the state needed to place it.
#[derive(Debug, Clone)]
pub struct CharEvent {
    /// The character code from the PDF string.
    pub char_code: u32,
    /// Decoded text, if the font encoding could map the code.
    pub unicode: Option<String>,
    /// Base font name with any subset prefix removed.
    pub font_name: String,
    pub font_size: f64,
    /// Text matrix at the moment the glyph was shown.
    pub text_matrix: [f64; 6],
    /// Current transformation matrix at the moment the glyph was shown.
    pub ctm: [f64; 6],
    /// Glyph width in glyph space (1/1000 of text space).
    pub displacement: f64,
    /// Horizontal scaling as a fraction (1.0 = 100%).
    pub h_scaling: f64,
    pub rise: f64,
    /// Glyph top in glyph space units above the baseline.
    pub ascent: f64,
    /// Glyph bottom in glyph space units (negative, below the baseline).
    pub descent: f64,
}

/// A recoverable problem met while interpreting a content stream.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpretWarning {
    /// Index of the operator being processed.
    pub operator_index: usize,
    /// Font resource name involved, if any.
    pub font_name: Option<String>,
    pub message: String,
}

/// Receives interpreter output. Both methods default to no-ops.
pub trait ContentHandler {
    fn on_char(&mut self, _event: CharEvent) {}

    fn on_warning(&mut self, _warning: InterpretWarning) {}
}
