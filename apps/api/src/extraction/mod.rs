//! Resume text extraction.
//!
//! `TextExtractor` runs an ordered list of strategies over the raw document bytes
//! and returns the first non-empty result. Strategy failures never leave this
//! module: they are logged and the next strategy runs. Total failure is an
//! empty string, which callers must treat as "no recoverable text".

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;

pub mod document;
pub mod ocr;
pub mod structural;

#[cfg(test)]
pub(crate) mod fixtures;

pub use document::DocumentHandle;
use ocr::{OcrStrategy, PdftoppmRasterizer, TesseractEngine};
use structural::PdfTextLayer;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF parse error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{tool} failed: {message}")]
    Tool { tool: &'static str, message: String },

    #[error("document has no pages")]
    NoPages,
}

/// One way of turning document bytes into text.
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract(&self, document: &[u8]) -> Result<String, ExtractionError>;
}

pub struct TextExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl TextExtractor {
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Text layer first, then rasterize + tesseract.
    pub fn from_config(config: &Config) -> Self {
        Self::new(vec![
            Box::new(PdfTextLayer),
            Box::new(OcrStrategy::new(
                PdftoppmRasterizer::new(config.ocr_dpi),
                TesseractEngine::new(config.ocr_lang.clone()),
            )),
        ])
    }

    /// Returns the trimmed text of the first strategy that produces any.
    pub fn extract(&self, document: &[u8]) -> String {
        for strategy in &self.strategies {
            // A panic inside a parser counts as a failed pass.
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| strategy.extract(document)));
            let Ok(result) = outcome else {
                warn!("{} extraction panicked, trying next strategy", strategy.name());
                continue;
            };
            match result {
                Ok(text) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        info!(
                            "Extracted {} chars via {}",
                            text.chars().count(),
                            strategy.name()
                        );
                        return text.to_string();
                    }
                    debug!("{} produced no text, trying next strategy", strategy.name());
                }
                Err(e) => warn!("{} extraction failed: {e}", strategy.name()),
            }
        }

        warn!("No extraction strategy produced text");
        String::new()
    }

    pub fn extract_file(&self, path: &Path) -> String {
        match std::fs::read(path) {
            Ok(bytes) => self.extract(&bytes),
            Err(e) => {
                warn!("Could not read document {}: {e}", path.display());
                String::new()
            }
        }
    }
}
