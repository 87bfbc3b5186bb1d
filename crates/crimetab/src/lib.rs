//! crimetab: find crime-by-state tables in PDF reports.
//!
//! Public facade over the workspace crates:
//!
//! - **crimetab-core**: backend-independent types and the table algorithms
//! - **crimetab-parse**: lopdf backend and content stream interpreter
//! - **crimetab** (this crate): [`Pdf`] and [`Page`]
//!
//! ```ignore
//! use crimetab::{Frame, Pdf, StreamSettings, screen_candidate};
//!
//! let pdf = Pdf::open_file("crimes.pdf")?;
//! let page = pdf.page(258)?;
//! for table in page.extract_tables(&StreamSettings::default()) {
//!     if let Some((frame, _header)) = Frame::from_raw(&table) {
//!         let _ = screen_candidate(frame);
//!     }
//! }
//! ```

mod page;
mod pdf;

pub use crimetab_core;
pub use crimetab_core::{
    BBox, CRIME_KEYWORDS, Char, CrimeCandidate, Frame, HEADER_SCAN_ROWS, HEADER_THRESHOLD,
    HeaderMatch, PdfError, RawTable, STATE_COLUMN, StreamSettings, TableError, WideTable, Word,
    WordOptions, find_stream_tables, reshape, screen_candidate,
};
pub use crimetab_parse;
pub use crimetab_parse::InterpretWarning;
pub use page::Page;
pub use pdf::Pdf;
