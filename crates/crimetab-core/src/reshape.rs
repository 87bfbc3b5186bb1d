//! Wide → long → wide reshaping of a crime-by-state table.
//!
//! Column labels such as `"Murder I"` carry a crime name and a statistic
//! code. The table is melted into one record per (state, label) pair, each
//! label is split into crime and stat, and the records are pivoted back to
//! one row per state with one column per `"{Crime}_{Stat}"`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::crime::STATE_COLUMN;
use crate::error::TableError;
use crate::frame::Frame;

static NUMBERING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+[\.\d+]*").expect("hardcoded numbering regex is valid"));

/// One melted cell: the state, the original column label and its value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LongRecord {
    pub state: String,
    pub crime_stat: String,
    pub value: String,
}

/// A long record whose label has been split into crime and stat.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplitRecord {
    pub state: String,
    pub crime: String,
    pub stat: String,
    pub value: String,
}

/// Reshaped output: `headers[0]` is `State/UT`, the rest are `"{Crime}_{Stat}"`.
///
/// A `None` cell marks a (state, crime, stat) combination with no value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WideTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl WideTable {
    /// Value at the row for `state` under column `header`.
    pub fn get(&self, state: &str, header: &str) -> Option<&str> {
        let col = self.headers.iter().position(|h| h == header)?;
        self.rows
            .iter()
            .find(|row| row.first().and_then(Option::as_deref) == Some(state))?
            .get(col)?
            .as_deref()
    }
}

/// Run the full melt → split → clean → pivot pipeline.
pub fn reshape(frame: &Frame) -> Result<WideTable, TableError> {
    let long = melt(frame, STATE_COLUMN)?;
    let split = split_crime_stat(long)
        .into_iter()
        .map(|r| SplitRecord {
            crime: clean_crime_name(&r.crime),
            ..r
        })
        .collect::<Vec<_>>();
    pivot(&split)
}

/// Turn every column except `id_column` into (label, value) records, row by row.
pub fn melt(frame: &Frame, id_column: &str) -> Result<Vec<LongRecord>, TableError> {
    let id = frame
        .column_index(id_column)
        .ok_or_else(|| TableError::MissingColumn(id_column.to_string()))?;

    let mut records = Vec::new();
    for row in &frame.rows {
        for (col, label) in frame.columns.iter().enumerate() {
            if col == id {
                continue;
            }
            records.push(LongRecord {
                state: row[id].clone(),
                crime_stat: label.clone(),
                value: row[col].clone(),
            });
        }
    }
    Ok(records)
}

/// Split each label into (crime, stat).
///
/// When any label holds a line break, labels that have one are split on
/// their first break. All other labels split on their last whitespace run.
pub fn split_crime_stat(records: Vec<LongRecord>) -> Vec<SplitRecord> {
    let any_break = records.iter().any(|r| r.crime_stat.contains('\n'));
    records
        .into_iter()
        .map(|r| {
            let (crime, stat) = match r.crime_stat.split_once('\n') {
                Some((crime, stat)) if any_break => (crime.to_string(), stat.to_string()),
                _ => split_last_whitespace(&r.crime_stat),
            };
            SplitRecord {
                state: r.state,
                crime,
                stat,
                value: r.value,
            }
        })
        .collect()
}

fn split_last_whitespace(label: &str) -> (String, String) {
    let label = label.trim_end();
    match label.rfind(char::is_whitespace) {
        Some(pos) => {
            let (crime, stat) = label.split_at(pos);
            (crime.trim_end().to_string(), stat.trim_start().to_string())
        }
        None => (label.to_string(), String::new()),
    }
}

/// Remove digit-and-dot numbering from a crime name.
pub fn clean_crime_name(crime: &str) -> String {
    NUMBERING.replace_all(crime, "").trim().to_string()
}

/// Pivot split records to one row per state and one column per (crime, stat).
///
/// States and columns come out in sorted order.
pub fn pivot(records: &[SplitRecord]) -> Result<WideTable, TableError> {
    let mut cells: BTreeMap<&str, BTreeMap<(&str, &str), &str>> = BTreeMap::new();
    let mut pairs: BTreeSet<(&str, &str)> = BTreeSet::new();

    for r in records {
        let key = (r.crime.as_str(), r.stat.as_str());
        pairs.insert(key);
        let row = cells.entry(r.state.as_str()).or_default();
        if row.insert(key, r.value.as_str()).is_some() {
            return Err(TableError::DuplicateEntry {
                state: r.state.clone(),
                crime: r.crime.clone(),
                stat: r.stat.clone(),
            });
        }
    }

    let headers = std::iter::once(STATE_COLUMN.to_string())
        .chain(pairs.iter().map(|(crime, stat)| format!("{crime}_{stat}")))
        .collect();

    let rows = cells
        .into_iter()
        .map(|(state, row)| {
            std::iter::once(Some(state.to_string()))
                .chain(pairs.iter().map(|key| row.get(key).map(|v| v.to_string())))
                .collect()
        })
        .collect();

    Ok(WideTable { headers, rows })
}
