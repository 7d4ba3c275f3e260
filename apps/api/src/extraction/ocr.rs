//! Rasterize-and-recognize fallback for scanned resumes.
//!
//! Production backends shell out to poppler's `pdftoppm` and the `tesseract`
//! CLI. Both sit behind traits so the page loop can be tested without them.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, warn};

use super::{ExtractionError, ExtractionStrategy};

/// Renders every page of a document to an image file.
pub trait PageRasterizer: Send + Sync {
    /// Returned paths are in page order and live inside `workdir`.
    fn rasterize(&self, document: &[u8], workdir: &Path) -> Result<Vec<PathBuf>, ExtractionError>;
}

/// Recognizes the text in a single page image.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &Path) -> Result<String, ExtractionError>;
}

pub struct OcrStrategy {
    rasterizer: Box<dyn PageRasterizer>,
    engine: Box<dyn OcrEngine>,
}

impl OcrStrategy {
    pub fn new(
        rasterizer: impl PageRasterizer + 'static,
        engine: impl OcrEngine + 'static,
    ) -> Self {
        Self {
            rasterizer: Box::new(rasterizer),
            engine: Box::new(engine),
        }
    }
}

impl ExtractionStrategy for OcrStrategy {
    fn name(&self) -> &'static str {
        "ocr"
    }

    /// Each page's recognized text is followed by a newline, in page order.
    fn extract(&self, document: &[u8]) -> Result<String, ExtractionError> {
        // Page images are removed with the directory on every exit path.
        let workdir = tempfile::tempdir()?;
        let images = self.rasterizer.rasterize(document, workdir.path())?;
        if images.is_empty() {
            return Err(ExtractionError::NoPages);
        }

        info!("Running OCR over {} rendered pages", images.len());
        let mut text = String::new();
        for (index, image) in images.iter().enumerate() {
            let page_text = self.engine.recognize(image)?;
            debug!("OCR page {}: {} chars", index + 1, page_text.len());
            text.push_str(&page_text);
            text.push('\n');
        }

        Ok(text)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// pdftoppm
// ────────────────────────────────────────────────────────────────────────────

/// True when both `pdftoppm` and `tesseract` can be spawned.
pub fn is_ocr_available() -> bool {
    let pdftoppm = Command::new("pdftoppm").arg("-v").output().is_ok();
    let tesseract = Command::new("tesseract").arg("--version").output().is_ok();

    if !pdftoppm {
        debug!("pdftoppm not found; install poppler-utils for OCR support");
    }
    if !tesseract {
        debug!("tesseract not found; install tesseract-ocr for OCR support");
    }
    pdftoppm && tesseract
}

pub struct PdftoppmRasterizer {
    dpi: u32,
}

impl PdftoppmRasterizer {
    pub fn new(dpi: u32) -> Self {
        Self { dpi }
    }
}

impl PageRasterizer for PdftoppmRasterizer {
    fn rasterize(&self, document: &[u8], workdir: &Path) -> Result<Vec<PathBuf>, ExtractionError> {
        let input = workdir.join("input.pdf");
        std::fs::write(&input, document)?;

        let output = Command::new("pdftoppm")
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(&input)
            .arg(workdir.join("page"))
            .output()
            .map_err(|e| ExtractionError::Tool {
                tool: "pdftoppm",
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(ExtractionError::Tool {
                tool: "pdftoppm",
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let mut pages: Vec<(u32, PathBuf)> = std::fs::read_dir(workdir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter_map(|path| page_number(&path).map(|n| (n, path)))
            .collect();
        pages.sort_by_key(|(n, _)| *n);

        Ok(pages.into_iter().map(|(_, path)| path).collect())
    }
}

/// Parses the page number out of pdftoppm's `page-<n>.png` naming. The
/// number is zero-padded to the width of the page count, so lexical order
/// is not reliable across documents.
fn page_number(path: &Path) -> Option<u32> {
    if path.extension()? != "png" {
        return None;
    }
    path.file_stem()?
        .to_str()?
        .strip_prefix("page-")?
        .parse()
        .ok()
}

// ────────────────────────────────────────────────────────────────────────────
// tesseract
// ────────────────────────────────────────────────────────────────────────────

pub struct TesseractEngine {
    lang: String,
}

impl TesseractEngine {
    pub fn new(lang: String) -> Self {
        Self { lang }
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &Path) -> Result<String, ExtractionError> {
        let output = Command::new("tesseract")
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .output()
            .map_err(|e| ExtractionError::Tool {
                tool: "tesseract",
                message: e.to_string(),
            })?;

        if !output.status.success() {
            warn!(
                "tesseract exited with {} on {}: {}",
                output.status,
                image.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
