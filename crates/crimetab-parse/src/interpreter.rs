//! Content stream interpreter.
//!
//! Walks the operators of a decoded content stream, maintaining the
//! graphics and text state, and reports each shown glyph to a
//! [`ContentHandler`]. Only what text placement needs is interpreted:
//! q/Q/cm, the text object, text state, positioning and showing operators,
//! and form XObjects invoked with `Do`. Paths, colors and images are skipped.

use std::collections::HashMap;

use crimetab_core::Ctm;
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Encoding, Object};

use crate::error::BackendError;
use crate::font_metrics::{self, FontMetrics, number, resolve};
use crate::handler::{CharEvent, ContentHandler, InterpretWarning};
use crate::text_renderer::{self, RawChar, TjElement};
use crate::text_state::{TextParams, TextState};

/// Maximum nesting of form XObjects.
pub const MAX_FORM_DEPTH: usize = 16;

/// A font resource resolved for the current scope.
struct LoadedFont<'a> {
    metrics: FontMetrics,
    encoding: Option<Encoding<'a>>,
    base_name: String,
    two_byte: bool,
}

/// CTM plus the q/Q stack.
#[derive(Debug, Default)]
struct GraphicsState {
    ctm: Ctm,
    stack: Vec<(Ctm, TextParams)>,
}

impl GraphicsState {
    fn save(&mut self, text: TextParams) {
        self.stack.push((self.ctm, text));
    }

    fn restore(&mut self) -> Option<TextParams> {
        let (ctm, text) = self.stack.pop()?;
        self.ctm = ctm;
        Some(text)
    }

    /// `cm`: the new matrix is applied before the current one.
    fn concat(&mut self, m: Ctm) {
        self.ctm = m.concat(&self.ctm);
    }
}

/// Interpret a page-level content stream.
pub fn interpret_page_content(
    doc: &Document,
    content: &[u8],
    resources: &Dictionary,
    handler: &mut dyn ContentHandler,
) -> Result<(), BackendError> {
    let mut gstate = GraphicsState::default();
    let mut tstate = TextState::new();
    interpret_content_stream(doc, content, resources, handler, 0, &mut gstate, &mut tstate)
}

fn interpret_content_stream(
    doc: &Document,
    content: &[u8],
    resources: &Dictionary,
    handler: &mut dyn ContentHandler,
    depth: usize,
    gstate: &mut GraphicsState,
    tstate: &mut TextState,
) -> Result<(), BackendError> {
    if depth > MAX_FORM_DEPTH {
        return Err(BackendError::Interpreter(format!(
            "form XObject nesting {depth} exceeds limit {MAX_FORM_DEPTH}"
        )));
    }

    let operations = Content::decode(content)
        .map_err(|e| BackendError::Interpreter(format!("failed to decode content stream: {e}")))?
        .operations;
    let mut fonts: HashMap<String, LoadedFont<'_>> = HashMap::new();

    for (index, op) in operations.iter().enumerate() {
        let operands = &op.operands;
        match op.operator.as_str() {
            "q" => gstate.save(tstate.save_params()),
            "Q" => {
                if let Some(params) = gstate.restore() {
                    tstate.restore_params(params);
                }
            }
            "cm" => {
                if let Some(m) = matrix(operands) {
                    gstate.concat(m);
                }
            }

            "BT" => tstate.begin_text(),
            "ET" => tstate.end_text(),
            "Tf" => {
                let (Some(name), Some(size)) = (name_operand(operands, 0), f64_operand(operands, 1))
                else {
                    continue;
                };
                if !fonts.contains_key(&name) {
                    match load_font(doc, resources, &name) {
                        Some(font) => {
                            fonts.insert(name.clone(), font);
                        }
                        None => warn(handler, index, Some(&name), "font not found in resources"),
                    }
                }
                tstate.set_font(name, size);
            }
            "Tm" => {
                if let Some(m) = matrix(operands) {
                    tstate.set_text_matrix(m);
                }
            }
            "Td" | "TD" => {
                let (Some(tx), Some(ty)) = (f64_operand(operands, 0), f64_operand(operands, 1))
                else {
                    continue;
                };
                if op.operator == "TD" {
                    tstate.move_text_position_and_set_leading(tx, ty);
                } else {
                    tstate.move_text_position(tx, ty);
                }
            }
            "T*" => tstate.move_to_next_line(),
            "Tc" | "Tw" | "Tz" | "TL" | "Ts" => {
                let Some(v) = f64_operand(operands, 0) else {
                    continue;
                };
                let params = &mut tstate.params;
                match op.operator.as_str() {
                    "Tc" => params.char_spacing = v,
                    "Tw" => params.word_spacing = v,
                    "Tz" => params.h_scaling = v,
                    "TL" => params.leading = v,
                    _ => params.rise = v,
                }
            }

            "Tj" => show(handler, gstate, tstate, &fonts, string_elements(operands.first())),
            "'" => {
                tstate.move_to_next_line();
                show(handler, gstate, tstate, &fonts, string_elements(operands.first()));
            }
            "\"" => {
                if let (Some(aw), Some(ac)) = (f64_operand(operands, 0), f64_operand(operands, 1)) {
                    tstate.params.word_spacing = aw;
                    tstate.params.char_spacing = ac;
                }
                tstate.move_to_next_line();
                show(handler, gstate, tstate, &fonts, string_elements(operands.get(2)));
            }
            "TJ" => show(handler, gstate, tstate, &fonts, tj_elements(operands.first())),

            "Do" => {
                if let Some(name) = name_operand(operands, 0) {
                    run_form_xobject(doc, resources, &name, handler, depth, gstate, tstate)?;
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// Emit one event per glyph shown by a text operator.
fn show(
    handler: &mut dyn ContentHandler,
    gstate: &GraphicsState,
    tstate: &mut TextState,
    fonts: &HashMap<String, LoadedFont<'_>>,
    elements: Vec<TjElement>,
) {
    if elements.is_empty() {
        return;
    }
    let font = fonts.get(&tstate.params.font_name);
    let default_metrics = FontMetrics::default();
    let metrics = font.map_or(&default_metrics, |f| &f.metrics);
    let two_byte = font.is_some_and(|f| f.two_byte);

    let raw = text_renderer::show_string_with_positioning(
        tstate,
        &elements,
        two_byte,
        &|code| metrics.get_width(code),
    );

    let font_name = font.map_or_else(|| tstate.params.font_name.clone(), |f| f.base_name.clone());
    for glyph in raw {
        handler.on_char(CharEvent {
            char_code: glyph.char_code,
            unicode: decode_glyph(font, &glyph),
            font_name: font_name.clone(),
            font_size: tstate.params.font_size,
            text_matrix: glyph.text_matrix,
            ctm: gstate.ctm.to_array(),
            displacement: glyph.width,
            h_scaling: tstate.h_scaling_normalized(),
            rise: tstate.params.rise,
            ascent: metrics.ascent(),
            descent: metrics.descent(),
        });
    }
}

/// Text for one glyph: the font encoding first, then a code-point fallback.
fn decode_glyph(font: Option<&LoadedFont<'_>>, glyph: &RawChar) -> Option<String> {
    let decoded = font
        .and_then(|f| f.encoding.as_ref())
        .and_then(|enc| Document::decode_text(enc, &glyph.bytes).ok())
        .filter(|s| !s.is_empty() && !s.contains('\u{0}'));
    decoded.or_else(|| char::from_u32(glyph.char_code).map(String::from))
}

fn load_font<'a>(doc: &'a Document, resources: &'a Dictionary, name: &str) -> Option<LoadedFont<'a>> {
    let fonts = resolve(doc, resources.get(b"Font").ok()?).as_dict().ok()?;
    let font = resolve(doc, fonts.get(name.as_bytes()).ok()?).as_dict().ok()?;

    let raw_base = font
        .get(b"BaseFont")
        .and_then(Object::as_name)
        .map(|n| String::from_utf8_lossy(n).into_owned())
        .unwrap_or_else(|_| name.to_string());
    let base_name = strip_subset_prefix(&raw_base).to_string();

    let two_byte = font_metrics::is_type0(font);
    let metrics = if two_byte {
        font_metrics::composite_font_metrics(doc, font)
    } else {
        font_metrics::simple_font_metrics(doc, font, &base_name)
    };

    let encoding = font.get_font_encoding(doc).ok();
    #[cfg(feature = "tracing")]
    {
        if encoding.is_none() {
            tracing::debug!(font = %base_name, "no usable encoding, falling back to raw codes");
        }
    }

    Some(LoadedFont {
        metrics,
        encoding,
        base_name,
        two_byte,
    })
}

/// Strip a six-letter subset tag such as `ABCDEF+` from a font name.
pub fn strip_subset_prefix(name: &str) -> &str {
    match name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.bytes().all(|b| b.is_ascii_uppercase()) => rest,
        _ => name,
    }
}

fn run_form_xobject(
    doc: &Document,
    resources: &Dictionary,
    name: &str,
    handler: &mut dyn ContentHandler,
    depth: usize,
    gstate: &mut GraphicsState,
    tstate: &mut TextState,
) -> Result<(), BackendError> {
    let Some(stream) = resources
        .get(b"XObject")
        .ok()
        .and_then(|o| resolve(doc, o).as_dict().ok())
        .and_then(|xobjects| xobjects.get(name.as_bytes()).ok())
        .and_then(|o| resolve(doc, o).as_stream().ok())
    else {
        return Ok(());
    };
    if !matches!(stream.dict.get(b"Subtype").and_then(Object::as_name), Ok(b"Form")) {
        return Ok(());
    }

    let content = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());
    let form_resources = stream
        .dict
        .get(b"Resources")
        .ok()
        .and_then(|o| resolve(doc, o).as_dict().ok())
        .unwrap_or(resources);

    gstate.save(tstate.save_params());
    if let Some(m) = stream
        .dict
        .get(b"Matrix")
        .ok()
        .and_then(|o| o.as_array().ok())
        .and_then(|arr| matrix(arr))
    {
        gstate.concat(m);
    }
    let result =
        interpret_content_stream(doc, &content, form_resources, handler, depth + 1, gstate, tstate);
    if let Some(params) = gstate.restore() {
        tstate.restore_params(params);
    }
    result
}

fn warn(handler: &mut dyn ContentHandler, index: usize, font: Option<&str>, message: &str) {
    #[cfg(feature = "tracing")]
    tracing::warn!(operator = index, font = ?font, "{message}");
    handler.on_warning(InterpretWarning {
        operator_index: index,
        font_name: font.map(str::to_string),
        message: message.to_string(),
    });
}

// --- Operand helpers ---

fn f64_operand(operands: &[Object], index: usize) -> Option<f64> {
    operands.get(index).and_then(number)
}

fn name_operand(operands: &[Object], index: usize) -> Option<String> {
    match operands.get(index)? {
        Object::Name(n) => Some(String::from_utf8_lossy(n).into_owned()),
        _ => None,
    }
}

fn matrix(operands: &[Object]) -> Option<Ctm> {
    if operands.len() < 6 {
        return None;
    }
    let mut m = [0.0; 6];
    for (slot, obj) in m.iter_mut().zip(operands) {
        *slot = number(obj)?;
    }
    Some(Ctm::from_array(&m))
}

fn string_elements(operand: Option<&Object>) -> Vec<TjElement> {
    match operand {
        Some(Object::String(bytes, _)) => vec![TjElement::String(bytes.clone())],
        _ => Vec::new(),
    }
}

fn tj_elements(operand: Option<&Object>) -> Vec<TjElement> {
    let Some(Object::Array(items)) = operand else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Object::String(bytes, _) => Some(TjElement::String(bytes.clone())),
            other => number(other).map(TjElement::Adjustment),
        })
        .collect()
}
