//! Text state for the content stream interpreter.
//!
//! Tracks the text object (BT/ET), the font (Tf), spacing parameters and the
//! text and line matrices moved by Tm, Td, TD, T* and by shown glyphs.

use crimetab_core::Ctm;

/// Text parameters saved and restored with the graphics state by q/Q.
///
/// The text and line matrices are not part of it; they live only inside a
/// BT/ET pair.
#[derive(Debug, Clone, PartialEq)]
pub struct TextParams {
    /// Tc
    pub char_spacing: f64,
    /// Tw, applied after byte 32 only
    pub word_spacing: f64,
    /// Tz, in percent
    pub h_scaling: f64,
    /// TL
    pub leading: f64,
    /// Resource name of the font selected by Tf (e.g. `F1`).
    pub font_name: String,
    pub font_size: f64,
    /// Ts
    pub rise: f64,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scaling: 100.0,
            leading: 0.0,
            font_name: String::new(),
            font_size: 0.0,
            rise: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextState {
    pub params: TextParams,
    in_text_object: bool,
    text_matrix: Ctm,
    line_matrix: Ctm,
}

impl TextState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_text_object(&self) -> bool {
        self.in_text_object
    }

    pub fn text_matrix(&self) -> &Ctm {
        &self.text_matrix
    }

    pub fn line_matrix(&self) -> &Ctm {
        &self.line_matrix
    }

    /// Horizontal scaling as a fraction (1.0 = 100%).
    pub fn h_scaling_normalized(&self) -> f64 {
        self.params.h_scaling / 100.0
    }

    /// `BT`: both matrices reset to identity.
    pub fn begin_text(&mut self) {
        self.text_matrix = Ctm::identity();
        self.line_matrix = Ctm::identity();
        self.in_text_object = true;
    }

    /// `ET`
    pub fn end_text(&mut self) {
        self.in_text_object = false;
    }

    /// `Tf`
    pub fn set_font(&mut self, font_name: String, font_size: f64) {
        self.params.font_name = font_name;
        self.params.font_size = font_size;
    }

    /// `Tm`: replaces, rather than concatenates, both matrices.
    pub fn set_text_matrix(&mut self, m: Ctm) {
        self.text_matrix = m;
        self.line_matrix = m;
    }

    /// `Td`: offset from the start of the current line.
    pub fn move_text_position(&mut self, tx: f64, ty: f64) {
        let translation = Ctm::new(1.0, 0.0, 0.0, 1.0, tx, ty);
        self.line_matrix = translation.concat(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    /// `TD`: same as `-ty TL` followed by `tx ty Td`.
    pub fn move_text_position_and_set_leading(&mut self, tx: f64, ty: f64) {
        self.params.leading = -ty;
        self.move_text_position(tx, ty);
    }

    /// `T*`
    pub fn move_to_next_line(&mut self) {
        let leading = self.params.leading;
        self.move_text_position(0.0, -leading);
    }

    /// Move the text matrix right by `tx` text space units.
    pub fn advance_text_position(&mut self, tx: f64) {
        let translation = Ctm::new(1.0, 0.0, 0.0, 1.0, tx, 0.0);
        self.text_matrix = translation.concat(&self.text_matrix);
    }

    /// Parameters to push on `q`.
    pub fn save_params(&self) -> TextParams {
        self.params.clone()
    }

    /// Parameters popped on `Q`.
    pub fn restore_params(&mut self, params: TextParams) {
        self.params = params;
    }
}
