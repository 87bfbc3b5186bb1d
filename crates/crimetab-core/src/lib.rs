//! crimetab-core: Backend-independent data types and algorithms.
//!
//! This crate provides the foundational types (BBox, Char, Word, RawTable)
//! and the table algorithms used by crimetab: stream table detection,
//! header detection, the crime-table filter and the melt/pivot reshape.

pub mod crime;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod reshape;
pub mod stream;
pub mod text;
pub mod words;

pub use crime::{CRIME_KEYWORDS, CrimeCandidate, STATE_COLUMN, screen_candidate};
pub use error::{PdfError, TableError};
pub use frame::{Frame, HEADER_SCAN_ROWS, HEADER_THRESHOLD, HeaderMatch};
pub use geometry::{BBox, Ctm, Point};
pub use reshape::{LongRecord, SplitRecord, WideTable, reshape};
pub use stream::{RawTable, StreamSettings, TextSegment, find_stream_tables};
pub use text::Char;
pub use words::{Word, WordExtractor, WordOptions};
