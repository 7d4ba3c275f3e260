//! Embedded text layer extraction via lopdf.

use lopdf::Document;
use tracing::debug;

use super::{ExtractionError, ExtractionStrategy};

/// Reads the PDF text layer page by page. Pages are concatenated in page
/// order with no separator; a page whose text cannot be decoded contributes
/// nothing.
pub struct PdfTextLayer;

impl ExtractionStrategy for PdfTextLayer {
    fn name(&self) -> &'static str {
        "pdf text layer"
    }

    fn extract(&self, document: &[u8]) -> Result<String, ExtractionError> {
        let doc = Document::load_mem(document)?;
        let pages = doc.get_pages();
        if pages.is_empty() {
            return Err(ExtractionError::NoPages);
        }

        let mut text = String::new();
        // get_pages is a BTreeMap keyed by 1-based page number
        for page_number in pages.keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(page_text) => text.push_str(&page_text),
                Err(e) => debug!("Skipping page {page_number}: {e}"),
            }
        }

        Ok(text)
    }
}
