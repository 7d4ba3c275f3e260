use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// An uploaded resume stored on disk for the lifetime of one request.
///
/// The backing file is removed when the handle is dropped or discarded, so
/// every exit path of the owning request cleans it up.
#[derive(Debug)]
pub struct DocumentHandle {
    file: NamedTempFile,
    original_name: Option<String>,
}

impl DocumentHandle {
    /// Writes `bytes` to a fresh file inside `dir`.
    pub fn store(dir: &Path, original_name: Option<&str>, bytes: &[u8]) -> io::Result<Self> {
        let suffix = original_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
            .unwrap_or_default();

        let mut file = tempfile::Builder::new()
            .prefix("resume-")
            .suffix(&suffix)
            .tempfile_in(dir)?;
        file.write_all(bytes)?;
        file.flush()?;

        debug!("Stored upload at {}", file.path().display());
        Ok(Self {
            file,
            original_name: original_name.map(str::to_string),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }

    /// Deletes the backing file now, logging instead of failing if it is already gone.
    pub fn discard(self) {
        let path = self.file.path().to_path_buf();
        match self.file.close() {
            Ok(()) => debug!("Removed upload {}", path.display()),
            Err(e) => warn!("Failed to remove upload {}: {e}", path.display()),
        }
    }
}
