//! Character boxes from interpreter events.
//!
//! Builds the text rendering matrix for each [`CharEvent`] and converts the
//! glyph rectangle to top-left origin page coordinates.

use crimetab_core::{BBox, Char, Ctm, Point};

use crate::handler::CharEvent;

/// Convert a [`CharEvent`] into a [`Char`].
///
/// `page_top` is the y coordinate of the page's upper edge in PDF space
/// (the MediaBox `y1`); the result is flipped so that `top` grows downward
/// from it.
pub fn char_from_event(event: &CharEvent, page_top: f64) -> Char {
    let font_size = event.font_size;

    // Trm = [Tfs*Th 0 0 Tfs 0 Trise] x Tm x CTM
    let font_matrix = Ctm::new(font_size * event.h_scaling, 0.0, 0.0, font_size, 0.0, event.rise);
    let trm = font_matrix
        .concat(&Ctm::from_array(&event.text_matrix))
        .concat(&Ctm::from_array(&event.ctm));

    // the box covers the glyph width only, not char or word spacing
    let w = event.displacement / 1000.0;
    let ascent = event.ascent / 1000.0;
    let descent = event.descent / 1000.0;

    let corners = [
        trm.transform_point(Point::new(0.0, descent)),
        trm.transform_point(Point::new(w, descent)),
        trm.transform_point(Point::new(w, ascent)),
        trm.transform_point(Point::new(0.0, ascent)),
    ];
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in &corners {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }

    let text = event.unicode.clone().unwrap_or_else(|| {
        char::from_u32(event.char_code)
            .map(String::from)
            .unwrap_or_else(|| "\u{FFFD}".to_string())
    });

    Char {
        text,
        bbox: BBox::new(min_x, page_top - max_y, max_x, page_top - min_y),
        fontname: event.font_name.clone(),
        size: font_size,
        upright: trm.b.abs() < 1e-6 && trm.c.abs() < 1e-6,
        char_code: event.char_code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_TOP: f64 = 842.0;

    fn event() -> CharEvent {
        CharEvent {
            char_code: 65,
            unicode: Some("A".to_string()),
            font_name: "Helvetica".to_string(),
            font_size: 12.0,
            text_matrix: [1.0, 0.0, 0.0, 1.0, 72.0, 720.0],
            ctm: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            displacement: 667.0,
            h_scaling: 1.0,
            rise: 0.0,
            ascent: 750.0,
            descent: -250.0,
        }
    }

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn basic_box_is_flipped() {
        let ch = char_from_event(&event(), PAGE_TOP);
        assert_eq!(ch.text, "A");
        assert_approx(ch.bbox.x0, 72.0);
        assert_approx(ch.bbox.x1, 72.0 + 8.004);
        // baseline 720, ascent 9pt, descent 3pt
        assert_approx(ch.bbox.top, PAGE_TOP - 729.0);
        assert_approx(ch.bbox.bottom, PAGE_TOP - 717.0);
        assert_approx(ch.bbox.height(), 12.0);
        assert!(ch.upright);
    }

    #[test]
    fn ctm_scale_and_rise() {
        let mut e = event();
        e.ctm = [2.0, 0.0, 0.0, 2.0, 0.0, 0.0];
        e.text_matrix = [1.0, 0.0, 0.0, 1.0, 10.0, 100.0];
        e.rise = 5.0;
        let ch = char_from_event(&e, PAGE_TOP);
        assert_approx(ch.bbox.x0, 20.0);
        // (100 + 5 + 9) * 2
        assert_approx(ch.bbox.top, PAGE_TOP - 228.0);
        assert_approx(ch.bbox.height(), 24.0);
    }

    #[test]
    fn horizontal_scaling_narrows_box() {
        let mut e = event();
        e.h_scaling = 0.5;
        let ch = char_from_event(&e, PAGE_TOP);
        assert_approx(ch.bbox.width(), 4.002);
    }

    #[test]
    fn rotated_text_is_not_upright() {
        let mut e = event();
        e.text_matrix = [0.0, 1.0, -1.0, 0.0, 100.0, 100.0];
        assert!(!char_from_event(&e, PAGE_TOP).upright);
    }

    #[test]
    fn text_falls_back_to_code_then_replacement() {
        let mut e = event();
        e.unicode = None;
        assert_eq!(char_from_event(&e, PAGE_TOP).text, "A");
        e.char_code = 0xD800;
        assert_eq!(char_from_event(&e, PAGE_TOP).text, "\u{FFFD}");
    }
}
