use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use crimetab::{
    CrimeCandidate, Frame, Pdf, RawTable, STATE_COLUMN, WideTable, reshape, screen_candidate,
};
use thiserror::Error;
use tracing::debug;

use crate::cli::Cli;
use crate::shared::{self, preview, raw_sheet_rows, wide_sheet_rows};
use crate::workbook::Workbook;

const PREVIEW_ROWS: usize = 3;

/// The input PDF does not exist.
#[derive(Debug, Error)]
#[error("the file '{}' was not found", .0.display())]
pub struct InputNotFound(pub PathBuf);

/// Extract the page's tables, write the clean table when one is found and
/// always write the raw dump.
///
/// An error from the clean branch is returned only after the raw dump has
/// been written.
pub fn run(cli: &Cli) -> Result<()> {
    let tables = extract(cli)?;
    println!("Total tables detected: {}", tables.len());

    let clean = export_clean(&tables, &cli.clean_output);
    if matches!(clean, Ok(false)) {
        println!("\nCould not find a valid crime-by-state table.");
    }

    export_raw(&tables, &cli.raw_output)?;
    println!("\nRaw tables exported to '{}'", cli.raw_output.display());

    clean?;
    if !cli.no_listing {
        println!();
        shared::print_listing("after");
    }
    Ok(())
}

fn extract(cli: &Cli) -> Result<Vec<RawTable>> {
    let bytes = match std::fs::read(&cli.input) {
        Ok(bytes) => bytes,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            return Err(InputNotFound(cli.input.clone()).into());
        }
        Err(error) => {
            return Err(error)
                .with_context(|| format!("failed to read '{}'", cli.input.display()));
        }
    };

    let pdf = Pdf::open(&bytes)?;
    if cli.page == 0 || cli.page > pdf.page_count() {
        bail!(
            "page {} is out of range, the document has {} pages",
            cli.page,
            pdf.page_count()
        );
    }
    // interpreter warnings are already logged by the parse layer
    let page = pdf.page(cli.page - 1)?;
    debug!(
        page = cli.page,
        chars = page.chars().len(),
        warnings = page.warnings().len(),
        "page interpreted"
    );

    Ok(page.extract_tables(&cli.stream_settings()))
}

/// Walk the tables in order and write the first crime-by-state table found.
/// Returns whether one was written.
fn export_clean(tables: &[RawTable], path: &Path) -> Result<bool> {
    for (i, table) in tables.iter().enumerate() {
        let number = i + 1;
        println!("\nProcessing Table #{number}, Page Range: {}", table.page);
        println!("Preview of first few rows:");
        println!("{}", preview(table, PREVIEW_ROWS));

        let Some((frame, header)) = Frame::from_raw(table) else {
            println!("Could not detect a valid header row. Skipping this table.");
            continue;
        };
        println!("Header detected and set from row {}", header.row);
        debug!(table = number, ratio = header.ratio, columns = ?frame.columns, "header row");

        let frame = match screen_candidate(frame) {
            CrimeCandidate::NotCrimeTable => {
                debug!(table = number, "no crime keyword");
                continue;
            }
            CrimeCandidate::MissingStateColumn(columns) => {
                found_message(table, number);
                println!("'{STATE_COLUMN}' column not found. Available columns:");
                println!("{columns:?}");
                continue;
            }
            CrimeCandidate::Ready(frame) => {
                found_message(table, number);
                frame
            }
        };

        let wide = reshape(&frame)
            .with_context(|| format!("failed to reshape table #{number}"))?;
        write_clean(&wide, path)?;
        println!("\nCleaned and reshaped data saved to '{}'", path.display());
        println!("Columns: {:?}", wide.headers);
        return Ok(true);
    }
    Ok(false)
}

fn found_message(table: &RawTable, number: usize) {
    println!(
        "Found potential crime-by-state table on Page: {}, Table #{number}",
        table.page
    );
}

fn write_clean(wide: &WideTable, path: &Path) -> Result<()> {
    let mut book = Workbook::new();
    book.add_sheet("Sheet1", wide_sheet_rows(wide))?;
    book.save(path)
        .with_context(|| format!("failed to write '{}'", path.display()))
}

/// One sheet per table; a page without tables still gets one empty sheet
/// so the file opens.
fn export_raw(tables: &[RawTable], path: &Path) -> Result<()> {
    let mut book = Workbook::new();
    for (i, table) in tables.iter().enumerate() {
        book.add_sheet(&format!("Table_{}", i + 1), raw_sheet_rows(table))?;
    }
    if tables.is_empty() {
        book.add_sheet("Sheet1", Vec::new())?;
    }
    book.save(path)
        .with_context(|| format!("failed to write '{}'", path.display()))
}
