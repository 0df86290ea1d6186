//! File discovery and loading.
//!
//! Each [`SearchPath`] resolves to one directory, which is checked for
//! `{dir}/{file_name}`:
//!
//! - [`SearchMode::Merge`]: every file found is returned in priority order;
//!   [`merge_documents`] folds them into one document, later files winning.
//! - [`SearchMode::FirstMatch`]: the list is searched from the
//!   **highest-priority end** and only the first file found is returned.
//!
//! Missing files are silently skipped in both modes. Only actual I/O errors
//! (permissions, etc.) are propagated.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::document::Document;
use crate::error::DosconfError;
use crate::types::{SearchMode, SearchPath};

/// Resolve a [`SearchPath`] to a concrete directory.
///
/// `app_name` is used by `SearchPath::Platform` to construct the platform-specific
/// config directory (e.g. `~/.config/{app_name}/` on Linux).
///
/// Returns `None` if the path cannot be resolved (e.g. no home directory found).
pub fn resolve_search_path(sp: &SearchPath, app_name: &str) -> Option<PathBuf> {
    match sp {
        SearchPath::Platform => {
            let proj = directories::ProjectDirs::from("", "", app_name)?;
            Some(proj.config_dir().to_path_buf())
        }
        SearchPath::Home(subdir) => {
            let user = directories::UserDirs::new()?;
            Some(user.home_dir().join(subdir))
        }
        SearchPath::Cwd => std::env::current_dir().ok(),
        SearchPath::Path(p) => Some(p.clone()),
    }
}

/// Resolve all search paths, dropping the ones that cannot be resolved.
pub fn expand_search_paths(search_paths: &[SearchPath], app_name: &str) -> Vec<PathBuf> {
    search_paths
        .iter()
        .filter_map(|sp| resolve_search_path(sp, app_name))
        .collect()
}

/// Read configuration files from the search paths, respecting [`SearchMode`].
pub fn load_config_files(
    search_paths: &[SearchPath],
    file_name: &str,
    app_name: &str,
    mode: SearchMode,
) -> Result<Vec<(PathBuf, Vec<u8>)>, DosconfError> {
    let dirs = expand_search_paths(search_paths, app_name);
    let files = match mode {
        SearchMode::Merge => load_all(&dirs, file_name)?,
        SearchMode::FirstMatch => load_first_match(&dirs, file_name)?,
    };
    debug!(
        searched = dirs.len(),
        found = files.len(),
        ?mode,
        file_name,
        "discovered config files"
    );
    Ok(files)
}

/// `Ok(None)` when the file does not exist.
fn read_if_present(path: &Path) -> Result<Option<Vec<u8>>, DosconfError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(DosconfError::IoError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn load_all(dirs: &[PathBuf], file_name: &str) -> Result<Vec<(PathBuf, Vec<u8>)>, DosconfError> {
    let mut results = Vec::new();
    for dir in dirs {
        let file_path = dir.join(file_name);
        if let Some(bytes) = read_if_present(&file_path)? {
            results.push((file_path, bytes));
        }
    }
    Ok(results)
}

fn load_first_match(
    dirs: &[PathBuf],
    file_name: &str,
) -> Result<Vec<(PathBuf, Vec<u8>)>, DosconfError> {
    for dir in dirs.iter().rev() {
        let file_path = dir.join(file_name);
        if let Some(bytes) = read_if_present(&file_path)? {
            return Ok(vec![(file_path, bytes)]);
        }
    }
    Ok(vec![])
}

/// Parse every file and merge them in order. The result remembers the path
/// of the last (highest-priority) file. `None` when `files` is empty.
pub fn merge_documents(files: &[(PathBuf, Vec<u8>)]) -> Result<Option<Document>, DosconfError> {
    let mut merged: Option<Document> = None;
    for (path, bytes) in files {
        let doc = Document::parse(bytes).inspect_err(|err| {
            warn!(path = %path.display(), %err, "failed to parse config file");
        })?;
        match merged.as_mut() {
            Some(base) => {
                base.merge_with(&doc)?;
                base.set_path(path);
            }
            None => {
                let mut doc = doc;
                doc.set_path(path);
                merged = Some(doc);
            }
        }
    }
    Ok(merged)
}

/// The single file that writes go to.
///
/// The highest-priority file that exists wins; when none exists, the file
/// name is joined to the highest-priority directory that resolves.
pub fn resolve_target_path(
    search_paths: &[SearchPath],
    file_name: &str,
    app_name: &str,
) -> Result<PathBuf, DosconfError> {
    let dirs = expand_search_paths(search_paths, app_name);
    if let Some((path, _)) = load_first_match(&dirs, file_name)?.into_iter().next() {
        return Ok(path);
    }
    dirs.last()
        .map(|dir| dir.join(file_name))
        .ok_or(DosconfError::NoPath)
}
