use crate::geometry::BBox;
use crate::text::Char;

/// Tolerances used when grouping characters into words.
#[derive(Debug, Clone)]
pub struct WordOptions {
    /// Largest horizontal gap allowed inside a word.
    pub x_tolerance: f64,
    /// Largest difference in `top` allowed inside a word.
    pub y_tolerance: f64,
    /// Keep spaces inside words rather than breaking on them.
    pub keep_blank_chars: bool,
}

impl Default for WordOptions {
    fn default() -> Self {
        Self {
            x_tolerance: 3.0,
            y_tolerance: 3.0,
            keep_blank_chars: false,
        }
    }
}

/// A run of adjacent characters on one line.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Word {
    pub text: String,
    /// Union of the character boxes.
    pub bbox: BBox,
    pub chars: Vec<Char>,
}

/// Groups page characters into words.
pub struct WordExtractor;

impl WordExtractor {
    /// Characters are sorted top-to-bottom, then left-to-right, and grouped
    /// while consecutive characters stay within `x_tolerance` horizontally and
    /// `y_tolerance` vertically. Whitespace splits words unless
    /// `keep_blank_chars` is set.
    pub fn extract(chars: &[Char], options: &WordOptions) -> Vec<Word> {
        if chars.is_empty() {
            return Vec::new();
        }

        let mut sorted_chars: Vec<&Char> = chars.iter().collect();
        sorted_chars.sort_by(|a, b| {
            a.bbox
                .top
                .total_cmp(&b.bbox.top)
                .then(a.bbox.x0.total_cmp(&b.bbox.x0))
        });

        let mut words = Vec::new();
        let mut current_chars: Vec<Char> = Vec::new();

        for &ch in &sorted_chars {
            if ch.is_blank() && !options.keep_blank_chars {
                Self::flush(&mut current_chars, &mut words);
                continue;
            }

            if let Some(last) = current_chars.last() {
                if Self::should_split(last, ch, options) {
                    Self::flush(&mut current_chars, &mut words);
                }
            }

            current_chars.push(ch.clone());
        }

        Self::flush(&mut current_chars, &mut words);
        words
    }

    /// Horizontal gap is the distance between x-intervals, 0 for overlapping chars.
    fn should_split(last: &Char, current: &Char, options: &WordOptions) -> bool {
        let x_gap =
            (last.bbox.x0.max(current.bbox.x0) - last.bbox.x1.min(current.bbox.x1)).max(0.0);
        let y_diff = (current.bbox.top - last.bbox.top).abs();
        x_gap > options.x_tolerance || y_diff > options.y_tolerance
    }

    fn flush(current: &mut Vec<Char>, words: &mut Vec<Word>) {
        if let Some(word) = Self::make_word(current) {
            words.push(word);
        }
        current.clear();
    }

    fn make_word(chars: &[Char]) -> Option<Word> {
        let bbox = chars.iter().map(|c| c.bbox).reduce(|a, b| a.union(&b))?;
        let text: String = chars.iter().map(|c| c.text.as_str()).collect();
        Some(Word {
            text,
            bbox,
            chars: chars.to_vec(),
        })
    }
}
