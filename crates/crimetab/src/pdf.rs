//! Top-level PDF document type.

use crimetab_core::{Char, PdfError};
use crimetab_parse::{
    CharEvent, ContentHandler, InterpretWarning, LopdfBackend, LopdfDocument, PdfBackend,
    char_from_event,
};

use crate::Page;

/// A PDF document opened for extraction.
///
/// ```ignore
/// let pdf = Pdf::open_file("crimes.pdf")?;
/// let page = pdf.page(258)?;
/// let tables = page.extract_tables(&StreamSettings::default());
/// ```
pub struct Pdf {
    doc: LopdfDocument,
}

/// Collects interpreter events for one page.
#[derive(Default)]
struct CollectingHandler {
    chars: Vec<CharEvent>,
    warnings: Vec<InterpretWarning>,
}

impl ContentHandler for CollectingHandler {
    fn on_char(&mut self, event: CharEvent) {
        self.chars.push(event);
    }

    fn on_warning(&mut self, warning: InterpretWarning) {
        self.warnings.push(warning);
    }
}

impl Pdf {
    /// Read a file into memory and open it.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::IoError`] if the file cannot be read, or any error
    /// of [`Pdf::open`].
    pub fn open_file(path: impl AsRef<std::path::Path>) -> Result<Self, PdfError> {
        let bytes = std::fs::read(path.as_ref()).map_err(|e| PdfError::IoError(e.to_string()))?;
        Self::open(&bytes)
    }

    /// Open a PDF document from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::PasswordRequired`] if the PDF is encrypted, or
    /// [`PdfError::ParseError`] if the bytes are not a readable PDF.
    pub fn open(bytes: &[u8]) -> Result<Self, PdfError> {
        let doc = LopdfBackend::open(bytes).map_err(PdfError::from)?;
        Ok(Self { doc })
    }

    pub fn page_count(&self) -> usize {
        LopdfBackend::page_count(&self.doc)
    }

    /// Interpret the page at `index` (0-based) into positioned characters.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the index is out of range, the page has no
    /// usable MediaBox or its content stream cannot be decoded.
    pub fn page(&self, index: usize) -> Result<Page, PdfError> {
        let lopdf_page = LopdfBackend::get_page(&self.doc, index).map_err(PdfError::from)?;
        let media_box =
            LopdfBackend::page_media_box(&self.doc, &lopdf_page).map_err(PdfError::from)?;

        let mut handler = CollectingHandler::default();
        LopdfBackend::interpret_page(&self.doc, &lopdf_page, &mut handler)
            .map_err(PdfError::from)?;

        // MediaBox values are as written: `top` holds y0 and `bottom` holds y1
        let (y0, y1) = (
            media_box.top.min(media_box.bottom),
            media_box.top.max(media_box.bottom),
        );
        let x0 = media_box.x0.min(media_box.x1);
        let chars: Vec<Char> = handler
            .chars
            .iter()
            .map(|event| {
                let mut ch = char_from_event(event, y1);
                ch.bbox.x0 -= x0;
                ch.bbox.x1 -= x0;
                ch
            })
            .collect();

        Ok(Page::new(
            index,
            (media_box.x1 - media_box.x0).abs(),
            y1 - y0,
            chars,
        )
        .with_warnings(handler.warnings))
    }
}

impl std::fmt::Debug for Pdf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pdf")
            .field("page_count", &self.page_count())
            .finish()
    }
}
