//! Text-showing operators (Tj, TJ, ', ").
//!
//! Splits strings into character codes, records where each glyph lands and
//! advances the text matrix past it.

use crate::text_state::TextState;

/// One glyph produced by a text-showing operator, before font decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct RawChar {
    pub char_code: u32,
    /// The string bytes that formed `char_code`.
    pub bytes: Vec<u8>,
    /// Glyph width in glyph space (1/1000 of text space).
    pub width: f64,
    /// Text space advance applied after the glyph:
    /// `((w0 / 1000) * font_size + char_spacing + word_spacing_if_space) * h_scaling`.
    pub displacement: f64,
    /// Text matrix before the advance.
    pub text_matrix: [f64; 6],
}

/// An element of a TJ array operand.
#[derive(Debug, Clone, PartialEq)]
pub enum TjElement {
    String(Vec<u8>),
    /// Thousandths of text space; positive values move left.
    Adjustment(f64),
}

/// Split string bytes into character codes.
///
/// Composite fonts use 2-byte big-endian codes; an odd trailing byte forms a
/// 1-byte code.
pub fn split_codes(bytes: &[u8], two_byte: bool) -> Vec<(u32, &[u8])> {
    let size = if two_byte { 2 } else { 1 };
    bytes
        .chunks(size)
        .map(|chunk| {
            let code = chunk.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b));
            (code, chunk)
        })
        .collect()
}

/// `Tj`: show a string.
pub fn show_string(
    text_state: &mut TextState,
    bytes: &[u8],
    two_byte: bool,
    get_width: &dyn Fn(u32) -> f64,
) -> Vec<RawChar> {
    let font_size = text_state.params.font_size;
    let h_scaling = text_state.h_scaling_normalized();

    split_codes(bytes, two_byte)
        .into_iter()
        .map(|(char_code, code_bytes)| {
            let text_matrix = text_state.text_matrix().to_array();
            let width = get_width(char_code);
            // word spacing applies to the single byte 32, never to a 2-byte code
            let word_spacing = if code_bytes == [32] {
                text_state.params.word_spacing
            } else {
                0.0
            };
            let tx = ((width / 1000.0) * font_size + text_state.params.char_spacing + word_spacing)
                * h_scaling;
            text_state.advance_text_position(tx);

            RawChar {
                char_code,
                bytes: code_bytes.to_vec(),
                width,
                displacement: tx,
                text_matrix,
            }
        })
        .collect()
}

/// `TJ`: show strings with kerning adjustments between them.
pub fn show_string_with_positioning(
    text_state: &mut TextState,
    elements: &[TjElement],
    two_byte: bool,
    get_width: &dyn Fn(u32) -> f64,
) -> Vec<RawChar> {
    let mut chars = Vec::new();
    for element in elements {
        match element {
            TjElement::String(bytes) => {
                chars.extend(show_string(text_state, bytes, two_byte, get_width));
            }
            TjElement::Adjustment(adj) => {
                let scale = text_state.params.font_size * text_state.h_scaling_normalized();
                text_state.advance_text_position(-(adj / 1000.0) * scale);
            }
        }
    }
    chars
}
