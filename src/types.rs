//! Where configuration files are looked up, and what to do with them.
//!
//! Discovery is controlled by two settings on the
//! [`DosconfBuilder`](crate::DosconfBuilder):
//!
//! - [`SearchPath`] lists candidate directories in **priority-ascending**
//!   order (last = highest priority). Each is checked for the configured
//!   file name (`dosbox.conf` unless changed).
//! - [`SearchMode`] decides what happens when several files are found.
//!
//! An explicit override path (typically a `--file` argument) bypasses both:
//! when given, that one file is used and nothing else is searched.
//!
//! # Common patterns
//!
//! **User file with a project-local overlay** (merged, local wins):
//! ```ignore
//! .search_paths(vec![SearchPath::Platform, SearchPath::Cwd])
//! ```
//!
//! **Nearest file wins** (no layering):
//! ```ignore
//! .search_paths(vec![SearchPath::Home(".dosbox"), SearchPath::Cwd])
//! .search_mode(SearchMode::FirstMatch)
//! ```
//!
//! Writes (`set`, `unset`, `merge`, `format`) always target a single file:
//! the override path when given, otherwise the highest-priority file found,
//! otherwise the configured file name in the highest-priority directory.

use std::path::PathBuf;

use crate::style::{Newline, Style};

/// Where to search for configuration files.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPath {
    /// Platform config directory (XDG on Linux, ~/Library/Application Support on macOS).
    Platform,
    /// A subdirectory under the user's home directory, e.g. `Home(".dosbox")`.
    Home(&'static str),
    /// Current working directory.
    Cwd,
    /// An explicit directory.
    Path(PathBuf),
}

/// How to handle multiple configuration files found across search paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Parse every file found and merge them in priority order, so later
    /// files override values of earlier ones.
    #[default]
    Merge,
    /// Use only the highest-priority file found.
    FirstMatch,
}

/// A configuration operation, independent of any CLI framework.
///
/// Keys are written `section.entry` and split at the first dot.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfAction {
    /// List `section.entry = value` lines, optionally for one section only.
    List { section: Option<String> },
    /// List section names.
    Sections,
    Get { key: String },
    /// Set a value, creating the section and entry when missing.
    Set { key: String, value: String },
    Unset { key: String },
    /// Merge another file into the target file.
    Merge { other: PathBuf },
    /// Rewrite the target file, optionally changing its dialect or line
    /// endings.
    Format {
        style: Option<Style>,
        newline: Option<Newline>,
    },
}
