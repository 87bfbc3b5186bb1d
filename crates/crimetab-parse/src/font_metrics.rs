//! Glyph widths and vertical extents from PDF font dictionaries.
//!
//! Simple fonts read /FirstChar and /Widths, falling back to the built-in
//! standard font tables. Composite (Type0) fonts read /DW and /W from their
//! descendant CIDFont. Descent comes from the /FontDescriptor.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object};

use crate::standard_fonts;

const DEFAULT_DESCENT: f64 = -250.0;
const DEFAULT_WIDTH: f64 = 600.0;
const DEFAULT_CID_WIDTH: f64 = 1000.0;

/// Widths and vertical extent of one font, in glyph space (1/1000 of text space).
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    widths: HashMap<u32, f64>,
    default_width: f64,
    descent: f64,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::new(HashMap::new(), DEFAULT_WIDTH, DEFAULT_DESCENT)
    }
}

impl FontMetrics {
    pub fn new(widths: HashMap<u32, f64>, default_width: f64, descent: f64) -> Self {
        Self {
            widths,
            default_width,
            descent,
        }
    }

    pub fn get_width(&self, code: u32) -> f64 {
        self.widths.get(&code).copied().unwrap_or(self.default_width)
    }

    /// Glyph bottom relative to the baseline (negative).
    pub fn descent(&self) -> f64 {
        self.descent
    }

    /// Glyph top: one em above the descent, so a glyph box is as tall as the font size.
    pub fn ascent(&self) -> f64 {
        1000.0 + self.descent
    }
}

/// Metrics for a simple (single-byte) font dictionary.
pub fn simple_font_metrics(doc: &Document, font: &Dictionary, base_name: &str) -> FontMetrics {
    let first_char = font.get(b"FirstChar").ok().and_then(number).unwrap_or(0.0) as u32;

    let mut widths: HashMap<u32, f64> = font
        .get(b"Widths")
        .ok()
        .map(|o| resolve(doc, o))
        .and_then(|o| o.as_array().ok())
        .map(|arr| {
            arr.iter()
                .enumerate()
                .filter_map(|(i, o)| Some((first_char + i as u32, number(resolve(doc, o))?)))
                .collect()
        })
        .unwrap_or_default();

    if widths.is_empty() {
        if let Some(table) = standard_fonts::lookup(base_name) {
            widths = (0u32..).zip(table.iter().map(|&w| f64::from(w))).collect();
        }
    }

    let descriptor = descriptor(doc, font);
    let default_width = descriptor
        .and_then(|d| d.get(b"MissingWidth").ok())
        .and_then(number)
        .unwrap_or(DEFAULT_WIDTH);

    FontMetrics::new(widths, default_width, descent(descriptor))
}

/// Metrics for a Type0 font, read from its first descendant CIDFont.
pub fn composite_font_metrics(doc: &Document, font: &Dictionary) -> FontMetrics {
    let Some(cid_font) = descendant_font(doc, font) else {
        return FontMetrics::new(HashMap::new(), DEFAULT_CID_WIDTH, DEFAULT_DESCENT);
    };

    let default_width = cid_font.get(b"DW").ok().and_then(number).unwrap_or(DEFAULT_CID_WIDTH);
    let widths = cid_font
        .get(b"W")
        .ok()
        .map(|o| resolve(doc, o))
        .and_then(|o| o.as_array().ok())
        .map(|arr| parse_w_array(doc, arr))
        .unwrap_or_default();

    FontMetrics::new(widths, default_width, descent(descriptor(doc, cid_font)))
}

/// Parse a CIDFont /W array: `c [w1 w2 ...]` and `c_first c_last w` entries.
pub fn parse_w_array(doc: &Document, objects: &[Object]) -> HashMap<u32, f64> {
    let mut widths = HashMap::new();
    let mut items = objects.iter().map(|o| resolve(doc, o));

    while let Some(first) = items.next() {
        let Some(start) = number(first).map(|v| v as u32) else {
            continue;
        };
        match items.next() {
            Some(Object::Array(list)) => {
                for (offset, w) in list.iter().enumerate() {
                    if let Some(w) = number(resolve(doc, w)) {
                        widths.insert(start + offset as u32, w);
                    }
                }
            }
            Some(end) => {
                let (Some(end), Some(w)) = (number(end), items.next().and_then(number)) else {
                    continue;
                };
                for code in start..=end as u32 {
                    widths.insert(code, w);
                }
            }
            None => break,
        }
    }
    widths
}

pub fn is_type0(font: &Dictionary) -> bool {
    matches!(font.get(b"Subtype").and_then(Object::as_name), Ok(b"Type0"))
}

fn descendant_font<'a>(doc: &'a Document, font: &'a Dictionary) -> Option<&'a Dictionary> {
    let fonts = resolve(doc, font.get(b"DescendantFonts").ok()?).as_array().ok()?;
    resolve(doc, fonts.first()?).as_dict().ok()
}

fn descriptor<'a>(doc: &'a Document, font: &'a Dictionary) -> Option<&'a Dictionary> {
    resolve(doc, font.get(b"FontDescriptor").ok()?).as_dict().ok()
}

fn descent(descriptor: Option<&Dictionary>) -> f64 {
    descriptor
        .and_then(|d| d.get(b"Descent").ok())
        .and_then(number)
        .filter(|d| *d < 0.0)
        .unwrap_or(DEFAULT_DESCENT)
}

pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

pub(crate) fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some(f64::from(*f)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    #[test]
    fn widths_array_with_first_char() {
        let doc = Document::with_version("1.5");
        let font = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Custom",
            "FirstChar" => 65,
            "Widths" => vec![Object::Integer(250), Object::Integer(500)],
        };
        let metrics = simple_font_metrics(&doc, &font, "Custom");
        assert_eq!(metrics.get_width(65), 250.0);
        assert_eq!(metrics.get_width(66), 500.0);
        assert_eq!(metrics.get_width(67), DEFAULT_WIDTH);
    }

    #[test]
    fn standard_font_fallback() {
        let doc = Document::with_version("1.5");
        let font = dictionary! { "Type" => "Font", "Subtype" => "Type1", "BaseFont" => "Helvetica" };
        let metrics = simple_font_metrics(&doc, &font, "Helvetica");
        assert_eq!(metrics.get_width(u32::from(b'A')), 667.0);
        assert_eq!(metrics.descent(), DEFAULT_DESCENT);
        assert_eq!(metrics.ascent(), 750.0);
    }

    #[test]
    fn descriptor_values_and_references() {
        let mut doc = Document::with_version("1.5");
        let descriptor_id = doc.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "Descent" => -200,
            "MissingWidth" => 300,
        });
        let font = dictionary! {
            "Subtype" => "TrueType",
            "FontDescriptor" => descriptor_id,
        };
        let metrics = simple_font_metrics(&doc, &font, "Unknown");
        assert_eq!(metrics.get_width(10), 300.0);
        assert_eq!(metrics.descent(), -200.0);
        assert_eq!(metrics.ascent(), 800.0);
    }

    #[test]
    fn w_array_both_forms() {
        let doc = Document::with_version("1.5");
        let objects = vec![
            Object::Integer(1),
            Object::Array(vec![Object::Integer(500), Object::Integer(600)]),
            Object::Integer(10),
            Object::Integer(12),
            Object::Integer(250),
        ];
        let widths = parse_w_array(&doc, &objects);
        assert_eq!(widths.get(&1), Some(&500.0));
        assert_eq!(widths.get(&2), Some(&600.0));
        assert_eq!(widths.get(&11), Some(&250.0));
        assert_eq!(widths.get(&13), None);
    }

    #[test]
    fn composite_font_reads_descendant() {
        let mut doc = Document::with_version("1.5");
        let cid_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "DW" => 800,
            "W" => vec![Object::Integer(3), Object::Array(vec![Object::Integer(400)])],
        });
        let font = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "DescendantFonts" => vec![Object::Reference(cid_id)],
        };
        assert!(is_type0(&font));
        let metrics = composite_font_metrics(&doc, &font);
        assert_eq!(metrics.get_width(3), 400.0);
        assert_eq!(metrics.get_width(4), 800.0);
    }
}
