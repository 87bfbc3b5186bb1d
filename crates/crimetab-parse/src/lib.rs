//! crimetab-parse: PDF parsing backend and content stream interpreter.
//!
//! Opens documents through a pluggable [`PdfBackend`] (lopdf by default),
//! interprets page content streams and turns shown glyphs into positioned
//! [`crimetab_core::Char`]s. Shared data types live in crimetab-core.

pub mod backend;
pub mod char_extraction;
pub mod error;
pub mod font_metrics;
pub mod handler;
pub mod interpreter;
pub mod lopdf_backend;
pub mod standard_fonts;
pub mod text_renderer;
pub mod text_state;

pub use backend::PdfBackend;
pub use char_extraction::char_from_event;
pub use crimetab_core;
pub use error::BackendError;
pub use handler::{CharEvent, ContentHandler, InterpretWarning};
pub use lopdf_backend::{LopdfBackend, LopdfDocument, LopdfPage};
