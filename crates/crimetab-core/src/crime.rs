//! Recognition and cleanup of crime-by-state tables.

use crate::frame::Frame;

/// Substrings that mark a table as crime statistics.
pub const CRIME_KEYWORDS: [&str; 4] = ["Dowry Deaths", "Murder", "Rape", "Assault"];

/// Identifier column naming the state or union territory.
pub const STATE_COLUMN: &str = "State/UT";

/// Outcome of screening a labelled table.
#[derive(Debug, Clone, PartialEq)]
pub enum CrimeCandidate {
    /// No crime keyword appears anywhere in the table.
    NotCrimeTable,
    /// Keywords matched but there is no [`STATE_COLUMN`]; carries the labels found.
    MissingStateColumn(Vec<String>),
    /// A cleaned table ready for reshaping.
    Ready(Frame),
}

/// Decide whether `frame` is a crime-by-state table and clean it if so.
///
/// Keywords are searched in the column labels as well as the data cells.
/// Cleaning drops rows whose state cell is empty and strips non-ASCII
/// characters from every remaining cell.
pub fn screen_candidate(frame: Frame) -> CrimeCandidate {
    if !CRIME_KEYWORDS.iter().any(|kw| frame.contains_text(kw)) {
        return CrimeCandidate::NotCrimeTable;
    }
    let Some(state_idx) = frame.column_index(STATE_COLUMN) else {
        return CrimeCandidate::MissingStateColumn(frame.columns);
    };

    let rows = frame
        .rows
        .into_iter()
        .filter(|row| row.get(state_idx).is_some_and(|s| !s.is_empty()))
        .map(|row| row.iter().map(|cell| strip_non_ascii(cell)).collect())
        .collect();

    CrimeCandidate::Ready(Frame {
        columns: frame.columns,
        rows,
    })
}

pub fn strip_non_ascii(s: &str) -> String {
    s.chars().filter(char::is_ascii).collect()
}
