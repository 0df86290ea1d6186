//! Operations behind the `list`, `sections`, `get`, `set` and `unset`
//! actions, and the [`ConfResult`] type callers use to display results.
//!
//! Keys address one entry as `section.entry`. The key is split at the first
//! dot, so entry names may contain dots but section names used in keys may
//! not.

use std::fmt;
use std::path::PathBuf;

use crate::document::Document;
use crate::error::DosconfError;
use crate::style;

/// Result of a configuration operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfResult {
    /// `section.entry = value` lines.
    Listing { entries: Vec<(String, String)> },
    /// Section names in document order.
    Sections(Vec<String>),
    /// One entry's value.
    KeyValue { key: String, value: String },
    /// Confirmation that a value was written to `path`.
    ValueSet {
        key: String,
        value: String,
        path: PathBuf,
    },
    /// Confirmation that an entry was removed from `path`.
    ValueUnset { key: String, path: PathBuf },
    /// Confirmation that `other` was merged into `path`.
    Merged { other: PathBuf, path: PathBuf },
    /// Confirmation that `path` was rewritten.
    Formatted { path: PathBuf },
}

impl fmt::Display for ConfResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfResult::Listing { entries } => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                Ok(())
            }
            ConfResult::Sections(names) => write!(f, "{}", names.join("\n")),
            ConfResult::KeyValue { key, value } => write!(f, "{key} = {value}"),
            ConfResult::ValueSet { key, value, path } => {
                write!(f, "Set {key} = {value} in {}", path.display())
            }
            ConfResult::ValueUnset { key, path } => {
                write!(f, "Unset {key} in {}", path.display())
            }
            ConfResult::Merged { other, path } => {
                write!(f, "Merged {} into {}", other.display(), path.display())
            }
            ConfResult::Formatted { path } => write!(f, "Rewrote {}", path.display()),
        }
    }
}

/// Split `section.entry`. Both halves must be non-empty.
pub fn split_key(key: &str) -> Result<(&str, &str), DosconfError> {
    match key.split_once('.') {
        Some((section, entry)) if !section.is_empty() && !entry.is_empty() => Ok((section, entry)),
        _ => Err(DosconfError::InvalidKey(key.to_string())),
    }
}

/// All entries of the document, or of one section.
pub fn list_values(doc: &Document, section: Option<&str>) -> Result<ConfResult, DosconfError> {
    let sections: Vec<_> = match section {
        Some(name) => vec![
            doc.section(name)
                .ok_or_else(|| DosconfError::SectionNotFound(name.to_string()))?,
        ],
        None => doc.sections().collect(),
    };
    let entries = sections
        .into_iter()
        .flat_map(|s| {
            s.entries()
                .map(move |e| (format!("{}.{}", s.name(), e.name()), e.value().to_string()))
        })
        .collect();
    Ok(ConfResult::Listing { entries })
}

pub fn list_sections(doc: &Document) -> ConfResult {
    ConfResult::Sections(doc.sections().map(|s| s.name().to_string()).collect())
}

pub fn get_value(doc: &Document, key: &str) -> Result<ConfResult, DosconfError> {
    let (section, entry) = split_key(key)?;
    let found = doc
        .section(section)
        .ok_or_else(|| DosconfError::SectionNotFound(section.to_string()))?;
    let value = found.value(entry).ok_or_else(|| DosconfError::EntryNotFound {
        section: found.name().to_string(),
        entry: entry.to_string(),
    })?;
    Ok(ConfResult::KeyValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Set a value, appending the section first when the document lacks it.
pub fn set_value(doc: &mut Document, key: &str, value: &str) -> Result<(), DosconfError> {
    let (section, entry) = split_key(key)?;
    if !style::is_valid_entry_name(entry) {
        return Err(DosconfError::InvalidEntryName(entry.to_string()));
    }
    if !doc.contains_section(section) {
        doc.new_section(section)?;
    }
    doc.set_value(section, entry, value)
}

pub fn unset_value(doc: &mut Document, key: &str) -> Result<(), DosconfError> {
    let (section, entry) = split_key(key)?;
    doc.remove_entry(section, entry)?;
    Ok(())
}
