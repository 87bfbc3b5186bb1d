//! End-to-end runs of the `crimetab` binary against generated PDFs.

use std::path::Path;

use assert_cmd::Command;
use calamine::{Data, Reader, Xlsx, open_workbook};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use predicates::prelude::*;
use tempfile::TempDir;

const CLEAN: &str = "clean_crime_data_by_state.xlsx";
const RAW: &str = "output_tables2.xlsx";

fn cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("crimetab").unwrap();
    cmd.current_dir(dir.path());
    cmd
}

/// One text run: (x, baseline y, text), Helvetica 10pt.
type Run<'a> = (i64, i64, &'a str);

/// Single-page A4 PDF with each run placed by its own text object, set in
/// font resource `font`. Only `F1` is defined in the page resources.
fn pdf_with_runs(runs: &[Run<'_>], font: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut operations = Vec::new();
    for &(x, y, text) in runs {
        operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.into(), 10.into()]),
            Operation::new("Td", vec![Object::Integer(x), Object::Integer(y)]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ]);
    }
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        "Contents" => content_id,
        "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}

/// A grid of rows 14pt apart starting at baseline 700, columns at x = 50, 200, 300.
fn grid(rows: &[[&'static str; 3]]) -> Vec<Run<'static>> {
    let mut runs = Vec::new();
    for (r, row) in rows.iter().enumerate() {
        let y = 700 - 14 * r as i64;
        for (&x, &text) in [50, 200, 300].iter().zip(row.iter()) {
            if !text.is_empty() {
                runs.push((x, y, text));
            }
        }
    }
    runs
}

fn workspace(runs: &[Run<'_>]) -> TempDir {
    workspace_with_font(runs, "F1")
}

fn workspace_with_font(runs: &[Run<'_>], font: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("crimes.pdf"), pdf_with_runs(runs, font)).unwrap();
    dir
}

fn sheet(path: &Path, name: &str) -> Vec<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    let range = workbook.worksheet_range(name).unwrap();
    let (height, width) = range.get_size();
    (0..height)
        .map(|r| {
            (0..width)
                .map(|c| match range.get((r, c)) {
                    Some(Data::Empty) | None => String::new(),
                    Some(value) => value.to_string(),
                })
                .collect()
        })
        .collect()
}

fn crime_grid() -> Vec<Run<'static>> {
    grid(&[
        ["State/UT", "Murder I", "Murder V"],
        ["Bihar", "10", "5"],
        ["Raj'asthan", "3", "4"],
    ])
}

#[test]
fn missing_input_prints_not_found_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    cmd(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Error: The file 'crimes.pdf' was not found.",
        ))
        .stdout(predicate::str::contains("Files in directory before processing: []"));

    assert!(!dir.path().join(CLEAN).exists());
    assert!(!dir.path().join(RAW).exists());
}

#[test]
fn crime_table_is_reshaped_by_state() {
    let dir = workspace(&crime_grid());
    cmd(&dir)
        .args(["--page", "1", "--no-listing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total tables detected: 1"))
        .stdout(predicate::str::contains("Processing Table #1, Page Range: 1"))
        .stdout(predicate::str::contains("Header detected and set from row 0"))
        .stdout(predicate::str::contains(
            "Found potential crime-by-state table on Page: 1, Table #1",
        ))
        .stdout(predicate::str::contains(format!(
            "Cleaned and reshaped data saved to '{CLEAN}'"
        )))
        .stdout(predicate::str::contains(
            r#"Columns: ["State/UT", "Murder_I", "Murder_V"]"#,
        ))
        .stdout(predicate::str::contains(format!("Raw tables exported to '{RAW}'")))
        .stdout(predicate::str::contains("Current working directory").not());

    let clean = sheet(&dir.path().join(CLEAN), "Sheet1");
    assert_eq!(
        clean,
        vec![
            vec!["State/UT", "Murder_I", "Murder_V"],
            vec!["Bihar", "10", "5"],
            vec!["Rajasthan", "3", "4"],
        ]
    );
}

#[test]
fn raw_export_keeps_original_cells_under_index_row() {
    let dir = workspace(&crime_grid());
    cmd(&dir).args(["--page", "1", "--no-listing"]).assert().success();

    let raw = sheet(&dir.path().join(RAW), "Table_1");
    assert_eq!(raw[0], vec!["0", "1", "2"]);
    assert_eq!(raw[1], vec!["State/UT", "Murder I", "Murder V"]);
    // the raw dump is taken before non-ASCII stripping
    assert_eq!(raw[3][0], "Raj\u{2019}asthan");
}

#[test]
fn title_row_above_header_is_skipped() {
    let mut runs = vec![(50, 716, "Crime Table")];
    runs.extend(crime_grid());
    let dir = workspace(&runs);

    cmd(&dir)
        .args(["--page", "1", "--no-listing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Header detected and set from row 1"));

    let clean = sheet(&dir.path().join(CLEAN), "Sheet1");
    assert_eq!(clean[1], vec!["Bihar", "10", "5"]);
}

#[test]
fn numeric_only_table_has_no_header() {
    let dir = workspace(&grid(&[["1", "2", "3"], ["4", "5", "6"], ["7", "8", "9"]]));
    cmd(&dir)
        .args(["--page", "1", "--no-listing"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Could not detect a valid header row. Skipping this table.",
        ))
        .stdout(predicate::str::contains("Could not find a valid crime-by-state table."));

    assert!(!dir.path().join(CLEAN).exists());
    assert!(dir.path().join(RAW).exists());
}

#[test]
fn table_without_keywords_only_gets_raw_export() {
    let dir = workspace(&grid(&[
        ["State/UT", "Population", "Area"],
        ["Goa", "15", "3702"],
        ["Kerala", "334", "38863"],
    ]));
    cmd(&dir)
        .args(["--page", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Could not find a valid crime-by-state table."))
        .stdout(predicate::str::contains("Files in directory after processing:"))
        .stdout(predicate::str::contains(RAW));

    assert!(!dir.path().join(CLEAN).exists());
    let raw = sheet(&dir.path().join(RAW), "Table_1");
    assert_eq!(raw[2], vec!["Goa", "15", "3702"]);
}

#[test]
fn keyword_table_without_state_column_is_rejected() {
    let dir = workspace(&grid(&[
        ["State", "Murder I", "Murder V"],
        ["Goa", "1", "2"],
        ["Kerala", "3", "4"],
    ]));
    cmd(&dir)
        .args(["--page", "1", "--no-listing"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "'State/UT' column not found. Available columns:",
        ))
        .stdout(predicate::str::contains(r#"["State", "Murder I", "Murder V"]"#));

    assert!(!dir.path().join(CLEAN).exists());
}

#[test]
fn page_out_of_range_is_unexpected_error() {
    let dir = workspace(&crime_grid());
    cmd(&dir)
        .args(["--page", "5", "--no-listing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("An unexpected error occurred:"))
        .stdout(predicate::str::contains("out of range"));

    assert!(!dir.path().join(RAW).exists());
}

#[test]
fn output_paths_are_configurable() {
    let dir = workspace(&crime_grid());
    cmd(&dir)
        .args([
            "--input",
            "crimes.pdf",
            "--page",
            "1",
            "--clean-output",
            "clean.xlsx",
            "--raw-output",
            "raw.xlsx",
            "--no-listing",
        ])
        .assert()
        .success();

    assert!(dir.path().join("clean.xlsx").exists());
    assert!(dir.path().join("raw.xlsx").exists());
    assert!(!dir.path().join(CLEAN).exists());
}

#[test]
fn not_a_pdf_is_unexpected_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("crimes.pdf"), b"hello").unwrap();
    cmd(&dir)
        .arg("--no-listing")
        .assert()
        .success()
        .stdout(predicate::str::contains("An unexpected error occurred:"));
}

#[test]
fn reshape_failure_still_writes_raw_workbook() {
    let dir = workspace(&grid(&[
        ["State/UT", "Murder I", "Murder V"],
        ["Bihar", "10", "5"],
        ["Bihar", "3", "4"],
    ]));
    let output = cmd(&dir)
        .args(["--page", "1", "--no-listing"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let exported = stdout.find("Raw tables exported to").unwrap();
    let failed = stdout.find("An unexpected error occurred:").unwrap();
    assert!(exported < failed, "raw export must be reported first:\n{stdout}");
    assert!(stdout.contains("duplicate entries"));
    assert!(stdout.contains("(Bihar, Murder, I)"));

    assert!(!dir.path().join(CLEAN).exists());
    let raw = sheet(&dir.path().join(RAW), "Table_1");
    assert_eq!(raw[3], vec!["Bihar", "3", "4"]);
}

#[test]
fn interpreter_warning_is_logged_once() {
    let dir = workspace_with_font(&crime_grid(), "F9");
    let output = cmd(&dir)
        .env_remove("RUST_LOG")
        .args(["--page", "1", "--no-listing"])
        .output()
        .unwrap();
    assert!(output.status.success());

    // one text object per cell, nine cells, one warning each
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("font not found in resources").count(), 9, "{stderr}");
}
