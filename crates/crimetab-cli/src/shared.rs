use std::io;
use std::path::Path;

use crimetab::{RawTable, WideTable};
use tracing::warn;

use crate::workbook::Cell;

/// Sorted entry names of `dir`.
pub fn list_dir(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<io::Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
}

/// Print `Files in directory <when> processing: [...]` for the working directory.
pub fn print_listing(when: &str) {
    match list_dir(Path::new(".")) {
        Ok(names) => println!("Files in directory {when} processing: {names:?}"),
        Err(error) => warn!(%error, "could not list working directory"),
    }
}

/// The first `limit` rows of a raw table under a row of column indices,
/// each column right-aligned to its widest cell.
pub fn preview(table: &RawTable, limit: usize) -> String {
    let columns = table.column_count();
    let header: Vec<String> = (0..columns).map(|i| i.to_string()).collect();
    let shown: Vec<&Vec<String>> = table.rows.iter().take(limit).collect();

    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            shown
                .iter()
                .filter_map(|row| row.get(c))
                .chain(std::iter::once(&header[c]))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render = |cells: &[String]| -> String {
        widths
            .iter()
            .enumerate()
            .map(|(c, &width)| {
                let cell = cells.get(c).map_or("", String::as_str);
                format!("{cell:>width$}")
            })
            .collect::<Vec<_>>()
            .join(" ")
    };

    std::iter::once(render(&header))
        .chain(shown.iter().map(|row| render(row)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Sheet rows for a raw table: a header row of column indices, then the cells.
pub fn raw_sheet_rows(table: &RawTable) -> Vec<Vec<Cell>> {
    let header: Vec<Cell> = (0..table.column_count()).map(|i| Cell::Number(i as f64)).collect();
    let body = table
        .rows
        .iter()
        .map(|row| row.iter().map(|cell| Cell::text(cell.as_str())).collect::<Vec<_>>());
    std::iter::once(header).chain(body).collect()
}

/// Sheet rows for the reshaped table: headers, then one row per state.
pub fn wide_sheet_rows(table: &WideTable) -> Vec<Vec<Cell>> {
    let header: Vec<Cell> = table.headers.iter().map(|h| Cell::text(h.as_str())).collect();
    std::iter::once(header)
        .chain(table.rows.iter().map(|row| {
            row.iter()
                .map(|cell| cell.as_deref().map_or(Cell::Empty, Cell::text))
                .collect::<Vec<_>>()
        }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crimetab::BBox;

    fn raw(rows: &[&[&str]]) -> RawTable {
        RawTable {
            page: "259".to_string(),
            bbox: BBox::new(0.0, 0.0, 100.0, 100.0),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn preview_aligns_columns_and_limits_rows() {
        let table = raw(&[
            &["State/UT", "Murder"],
            &["Goa", "1"],
            &["Bihar", "10"],
            &["Kerala", "7"],
        ]);
        let text = preview(&table, 3);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "       0      1");
        assert_eq!(lines[1], "State/UT Murder");
        assert_eq!(lines[3], "   Bihar     10");
    }

    #[test]
    fn raw_rows_start_with_indices() {
        let rows = raw_sheet_rows(&raw(&[&["a", ""], &["b", "c"]]));
        assert_eq!(rows[0], vec![Cell::Number(0.0), Cell::Number(1.0)]);
        assert_eq!(rows[1], vec![Cell::text("a"), Cell::Empty]);
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn wide_rows_leave_missing_values_empty() {
        let table = WideTable {
            headers: vec!["State/UT".to_string(), "Murder_I".to_string()],
            rows: vec![vec![Some("Goa".to_string()), None]],
        };
        let rows = wide_sheet_rows(&table);
        assert_eq!(rows[0][1], Cell::text("Murder_I"));
        assert_eq!(rows[1], vec![Cell::text("Goa"), Cell::Empty]);
    }

    #[test]
    fn list_dir_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "").unwrap();
        std::fs::write(dir.path().join("a.pdf"), "").unwrap();
        assert_eq!(list_dir(dir.path()).unwrap(), vec!["a.pdf", "b.txt"]);
    }
}
