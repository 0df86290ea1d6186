//! Reading documents from disk and writing them back.
//!
//! A loaded document remembers its path so [`Document::save`] can write it
//! back in place. Saving creates parent directories as needed and refuses to
//! replace an existing file unless asked to.

use std::path::Path;

use tracing::debug;

use crate::document::Document;
use crate::error::DosconfError;

impl Document {
    /// Read and parse the file at `path`.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Document, DosconfError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| DosconfError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut doc = Document::parse(&bytes)?;
        doc.set_path(path);
        debug!(path = %path.display(), sections = doc.len(), "loaded document");
        Ok(doc)
    }

    /// Serialize to `path` with the document's own style and newline, and
    /// remember `path` for later [`save`](Self::save) calls.
    pub fn save_to(&mut self, path: impl AsRef<Path>, overwrite: bool) -> Result<(), DosconfError> {
        let path = path.as_ref();
        if !overwrite && path.exists() {
            return Err(DosconfError::FileExists(path.to_path_buf()));
        }
        let bytes = self.serialize(None, None)?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| DosconfError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path, &bytes).map_err(|e| DosconfError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.set_path(path);
        debug!(path = %path.display(), bytes = bytes.len(), "saved document");
        Ok(())
    }

    /// Save to the path the document was loaded from or last saved to.
    pub fn save(&mut self, overwrite: bool) -> Result<(), DosconfError> {
        let path = self.path().ok_or(DosconfError::NoPath)?.to_path_buf();
        self.save_to(path, overwrite)
    }
}
