use std::path::PathBuf;

use clap::Parser;
use crimetab::{StreamSettings, WordOptions};

/// Find a crime-by-state table on one PDF page, reshape it into a clean
/// wide table and dump every detected table for inspection.
#[derive(Debug, Parser)]
#[command(name = "crimetab", about, version)]
pub struct Cli {
    /// Path to the PDF report
    #[arg(long, value_name = "FILE", default_value = "crimes.pdf")]
    pub input: PathBuf,

    /// Page to read (1-based)
    #[arg(long, default_value_t = 259)]
    pub page: usize,

    /// Where the cleaned wide table is written
    #[arg(long, value_name = "FILE", default_value = "clean_crime_data_by_state.xlsx")]
    pub clean_output: PathBuf,

    /// Where every raw table is written, one sheet each
    #[arg(long, value_name = "FILE", default_value = "output_tables2.xlsx")]
    pub raw_output: PathBuf,

    /// Max vertical distance (points) between segment centers on one row
    #[arg(long, default_value_t = 2.0)]
    pub row_tolerance: f64,

    /// Max gap between words of one cell, as a multiple of word height
    #[arg(long, default_value_t = 1.0)]
    pub segment_gap_ratio: f64,

    /// Minimum segments a row needs for its block to count as a table
    #[arg(long, default_value_t = 2)]
    pub min_columns: usize,

    /// Do not list the working directory before and after processing
    #[arg(long)]
    pub no_listing: bool,
}

impl Cli {
    pub fn stream_settings(&self) -> StreamSettings {
        StreamSettings {
            word_options: WordOptions::default(),
            segment_gap_ratio: self.segment_gap_ratio,
            row_tolerance: self.row_tolerance,
            min_columns: self.min_columns,
            ..StreamSettings::default()
        }
    }
}
