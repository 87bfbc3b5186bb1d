//! Stream-flavor table detection.
//!
//! Finds tables from whitespace alignment alone, with no ruling lines:
//! characters are grouped into words, words into text segments and rows,
//! rows into vertically contiguous blocks, and each block's columns are
//! derived from the horizontal extents of its most common row shape.

use std::collections::BTreeMap;

use crate::geometry::BBox;
use crate::text::Char;
use crate::words::{Word, WordExtractor, WordOptions};

/// Configuration for stream table detection.
#[derive(Debug, Clone)]
pub struct StreamSettings {
    /// Options used to group characters into words.
    pub word_options: WordOptions,
    /// Words on one line join into a segment when their gap is at most
    /// this multiple of the word height.
    pub segment_gap_ratio: f64,
    /// Maximum distance between vertical midpoints of segments in one row.
    pub row_tolerance: f64,
    /// A new table starts when the gap between rows exceeds this multiple
    /// of the median row height.
    pub table_gap_ratio: f64,
    /// Column intervals closer than this are merged.
    pub column_tolerance: f64,
    /// Minimum segments a row must have for its block to count as a table.
    pub min_columns: usize,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            word_options: WordOptions::default(),
            segment_gap_ratio: 1.0,
            row_tolerance: 2.0,
            table_gap_ratio: 2.5,
            column_tolerance: 0.0,
            min_columns: 2,
        }
    }
}

/// A run of words on one line separated only by small gaps.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextSegment {
    pub text: String,
    pub bbox: BBox,
}

/// A table found on a page: a grid of text cells.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawTable {
    /// Page-range label of the page the table was found on (1-based, e.g. `"259"`).
    pub page: String,
    /// Bounding box enclosing every segment of the table.
    pub bbox: BBox,
    /// Rows top to bottom; every row has `column_count()` cells.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// A horizontal line of segments, left to right.
#[derive(Debug, Clone)]
struct Row {
    segments: Vec<TextSegment>,
    bbox: BBox,
}

/// Detect tables among the characters of one page.
pub fn find_stream_tables(chars: &[Char], settings: &StreamSettings, page: &str) -> Vec<RawTable> {
    let words = WordExtractor::extract(chars, &settings.word_options);
    let rows = words_to_rows(&words, settings);
    if rows.is_empty() {
        return Vec::new();
    }

    split_blocks(rows, settings.table_gap_ratio)
        .into_iter()
        .filter(|block| {
            block.len() >= 2
                && block
                    .iter()
                    .any(|row| row.segments.len() >= settings.min_columns)
        })
        .map(|block| build_table(&block, settings, page))
        .collect()
}

/// Cluster words into rows by vertical midpoint, then join close words into segments.
fn words_to_rows(words: &[Word], settings: &StreamSettings) -> Vec<Row> {
    let mut sorted: Vec<&Word> = words.iter().collect();
    sorted.sort_by(|a, b| {
        a.bbox
            .middle()
            .total_cmp(&b.bbox.middle())
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });

    let mut lines: Vec<Vec<&Word>> = Vec::new();
    for word in sorted {
        match lines.last_mut() {
            Some(line)
                if (word.bbox.middle() - line[0].bbox.middle()).abs()
                    <= settings.row_tolerance =>
            {
                line.push(word);
            }
            _ => lines.push(vec![word]),
        }
    }

    lines
        .into_iter()
        .filter_map(|mut line| {
            line.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
            let segments = join_segments(&line, settings.segment_gap_ratio);
            let bbox = segments.iter().map(|s| s.bbox).reduce(|a, b| a.union(&b))?;
            Some(Row { segments, bbox })
        })
        .collect()
}

fn join_segments(line: &[&Word], gap_ratio: f64) -> Vec<TextSegment> {
    let mut segments: Vec<TextSegment> = Vec::new();
    for word in line {
        if let Some(last) = segments.last_mut() {
            let gap = word.bbox.x0 - last.bbox.x1;
            let limit = gap_ratio * word.bbox.height().max(last.bbox.height());
            if gap <= limit {
                last.text.push(' ');
                last.text.push_str(&word.text);
                last.bbox = last.bbox.union(&word.bbox);
                continue;
            }
        }
        segments.push(TextSegment {
            text: word.text.clone(),
            bbox: word.bbox,
        });
    }
    segments
}

/// Split rows into vertically contiguous blocks.
fn split_blocks(rows: Vec<Row>, gap_ratio: f64) -> Vec<Vec<Row>> {
    let mut heights: Vec<f64> = rows.iter().map(|r| r.bbox.height()).collect();
    heights.sort_by(f64::total_cmp);
    let median = heights[heights.len() / 2];
    let max_gap = gap_ratio * median;

    let mut blocks: Vec<Vec<Row>> = Vec::new();
    for row in rows {
        match blocks.last_mut() {
            Some(block)
                if block
                    .last()
                    .is_some_and(|prev| row.bbox.top - prev.bbox.bottom <= max_gap) =>
            {
                block.push(row);
            }
            _ => blocks.push(vec![row]),
        }
    }
    blocks
}

fn build_table(block: &[Row], settings: &StreamSettings, page: &str) -> RawTable {
    let columns = column_intervals(block, settings);

    let rows = block
        .iter()
        .map(|row| {
            let mut cells = vec![String::new(); columns.len()];
            for segment in &row.segments {
                let cell = &mut cells[assign_column(&segment.bbox, &columns)];
                if !cell.is_empty() {
                    cell.push(' ');
                }
                cell.push_str(&segment.text);
            }
            cells
        })
        .collect();

    let bbox = block
        .iter()
        .map(|r| r.bbox)
        .reduce(|a, b| a.union(&b))
        .unwrap_or(BBox::new(0.0, 0.0, 0.0, 0.0));

    RawTable {
        page: page.to_string(),
        bbox,
        rows,
    }
}

/// Column x-intervals for a block, left to right.
///
/// Seeded from the rows with the modal segment count; segments of other
/// rows that overlap no seeded column open columns of their own.
fn column_intervals(block: &[Row], settings: &StreamSettings) -> Vec<(f64, f64)> {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for row in block.iter().filter(|r| r.segments.len() > 1) {
        *counts.entry(row.segments.len()).or_default() += 1;
    }
    let modal = counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then(a.0.cmp(b.0)))
        .map_or(1, |(&count, _)| count);

    let seeds = block
        .iter()
        .filter(|r| r.segments.len() == modal)
        .flat_map(|r| r.segments.iter().map(|s| (s.bbox.x0, s.bbox.x1)))
        .collect();
    let mut columns = merge_intervals(seeds, settings.column_tolerance);

    let tol = settings.column_tolerance;
    let extras = block
        .iter()
        .flat_map(|r| r.segments.iter())
        .filter(|s| {
            !columns
                .iter()
                .any(|&(x0, x1)| s.bbox.x1 + tol >= x0 && s.bbox.x0 <= x1 + tol)
        })
        .map(|s| (s.bbox.x0, s.bbox.x1))
        .collect();
    columns.extend(merge_intervals(extras, settings.column_tolerance));
    columns.sort_by(|a, b| a.0.total_cmp(&b.0));
    columns
}

fn merge_intervals(mut intervals: Vec<(f64, f64)>, tolerance: f64) -> Vec<(f64, f64)> {
    intervals.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut merged: Vec<(f64, f64)> = Vec::new();
    for (x0, x1) in intervals {
        match merged.last_mut() {
            Some(last) if x0 <= last.1 + tolerance => last.1 = last.1.max(x1),
            _ => merged.push((x0, x1)),
        }
    }
    merged
}

/// Index of the column a segment belongs to: largest overlap, else nearest center.
fn assign_column(bbox: &BBox, columns: &[(f64, f64)]) -> usize {
    let overlap = |&(x0, x1): &(f64, f64)| (bbox.x1.min(x1) - bbox.x0.max(x0)).max(0.0);
    let best = columns
        .iter()
        .enumerate()
        .max_by(|a, b| overlap(a.1).total_cmp(&overlap(b.1)).then(b.0.cmp(&a.0)));

    match best {
        Some((index, column)) if overlap(column) > 0.0 => index,
        _ => columns
            .iter()
            .enumerate()
            .min_by(|a, b| {
                let da = ((a.1.0 + a.1.1) / 2.0 - bbox.center()).abs();
                let db = ((b.1.0 + b.1.1) / 2.0 - bbox.center()).abs();
                da.total_cmp(&db)
            })
            .map_or(0, |(index, _)| index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAR_WIDTH: f64 = 5.0;
    const FONT_SIZE: f64 = 10.0;

    /// Lay out `text` as 5pt-wide chars starting at `x`, with its top at `top`.
    fn place(chars: &mut Vec<Char>, text: &str, x: f64, top: f64) {
        for (i, c) in text.chars().enumerate() {
            let x0 = x + i as f64 * CHAR_WIDTH;
            chars.push(Char {
                text: c.to_string(),
                bbox: BBox::new(x0, top, x0 + CHAR_WIDTH, top + FONT_SIZE),
                fontname: "Helvetica".to_string(),
                size: FONT_SIZE,
                upright: true,
                char_code: c as u32,
            });
        }
    }

    fn layout(lines: &[(f64, &[(f64, &str)])]) -> Vec<Char> {
        let mut chars = Vec::new();
        for (top, cells) in lines {
            for (x, text) in cells.iter() {
                place(&mut chars, text, *x, *top);
            }
        }
        chars
    }

    #[test]
    fn test_empty_page_has_no_tables() {
        let tables = find_stream_tables(&[], &StreamSettings::default(), "1");
        assert!(tables.is_empty());
    }

    #[test]
    fn test_simple_grid() {
        let chars = layout(&[
            (100.0, &[(50.0, "State/UT"), (200.0, "Murder I"), (300.0, "Murder V")]),
            (115.0, &[(50.0, "Bihar"), (200.0, "10"), (300.0, "5")]),
            (130.0, &[(50.0, "Goa"), (200.0, "2"), (300.0, "1")]),
        ]);

        let tables = find_stream_tables(&chars, &StreamSettings::default(), "259");
        assert_eq!(tables.len(), 1);
        let table = &tables[0];
        assert_eq!(table.page, "259");
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.rows[0], vec!["State/UT", "Murder I", "Murder V"]);
        assert_eq!(table.rows[1], vec!["Bihar", "10", "5"]);
        assert_eq!(table.rows[2], vec!["Goa", "2", "1"]);
    }

    #[test]
    fn test_words_with_small_gap_join_into_one_cell() {
        let chars = layout(&[
            (100.0, &[(50.0, "Dowry"), (82.0, "Deaths"), (200.0, "Rape")]),
            (115.0, &[(50.0, "1"), (200.0, "2")]),
        ]);

        let tables = find_stream_tables(&chars, &StreamSettings::default(), "1");
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows[0], vec!["Dowry Deaths", "Rape"]);
    }

    #[test]
    fn test_large_vertical_gap_splits_tables() {
        let chars = layout(&[
            (100.0, &[(50.0, "A"), (200.0, "B")]),
            (115.0, &[(50.0, "1"), (200.0, "2")]),
            (400.0, &[(50.0, "C"), (200.0, "D")]),
            (415.0, &[(50.0, "3"), (200.0, "4")]),
        ]);

        let tables = find_stream_tables(&chars, &StreamSettings::default(), "1");
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].rows[0], vec!["A", "B"]);
        assert_eq!(tables[1].rows[1], vec!["3", "4"]);
    }

    #[test]
    fn test_single_column_text_is_not_a_table() {
        let chars = layout(&[
            (100.0, &[(50.0, "Paragraph")]),
            (115.0, &[(50.0, "continues")]),
        ]);
        let tables = find_stream_tables(&chars, &StreamSettings::default(), "1");
        assert!(tables.is_empty());
    }

    #[test]
    fn test_title_row_is_kept_in_first_column() {
        let chars = layout(&[
            (85.0, &[(50.0, "Crimes")]),
            (100.0, &[(50.0, "State/UT"), (200.0, "Rape I")]),
            (115.0, &[(50.0, "Goa"), (200.0, "4")]),
        ]);

        let tables = find_stream_tables(&chars, &StreamSettings::default(), "1");
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows[0], vec!["Crimes", ""]);
        assert_eq!(tables[0].row_count(), 3);
    }

    #[test]
    fn test_unaligned_segment_opens_new_column() {
        let chars = layout(&[
            (100.0, &[(50.0, "A"), (200.0, "B")]),
            (115.0, &[(50.0, "1"), (200.0, "2")]),
            (130.0, &[(50.0, "3"), (120.0, "x"), (200.0, "4")]),
        ]);

        let tables = find_stream_tables(&chars, &StreamSettings::default(), "1");
        assert_eq!(tables[0].column_count(), 3);
        assert_eq!(tables[0].rows[0], vec!["A", "", "B"]);
        assert_eq!(tables[0].rows[2], vec!["3", "x", "4"]);
    }

    #[test]
    fn test_merge_intervals_joins_overlaps() {
        let merged = merge_intervals(vec![(10.0, 20.0), (15.0, 30.0), (40.0, 50.0)], 0.0);
        assert_eq!(merged, vec![(10.0, 30.0), (40.0, 50.0)]);
    }

    #[test]
    fn test_assign_column_falls_back_to_nearest_center() {
        let columns = vec![(0.0, 10.0), (100.0, 110.0)];
        let bbox = BBox::new(80.0, 0.0, 90.0, 10.0);
        assert_eq!(assign_column(&bbox, &columns), 1);
    }
}
