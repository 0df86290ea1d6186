use std::path::PathBuf;
use thiserror::Error;

/// Why a line could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("expected a section header, found '{0}'")]
    OutsideSection(String),

    #[error("malformed entry '{0}' (expected name=value)")]
    MalformedEntry(String),

    #[error("invalid section name '{0}'")]
    InvalidSectionName(String),

    #[error("invalid entry name '{0}'")]
    InvalidEntryName(String),

    #[error("section '{0}' appears twice")]
    DuplicateSection(String),

    #[error("entry '{0}' appears twice in its section")]
    DuplicateEntry(String),
}

#[derive(Debug, Error)]
pub enum DosconfError {
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: ParseErrorKind },

    #[error("Input is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("Invalid section name '{0}'")]
    InvalidSectionName(String),

    #[error("Invalid entry name '{0}'")]
    InvalidEntryName(String),

    #[error("Invalid value for '{name}': values must fit on one line without surrounding whitespace")]
    InvalidEntryValue { name: String },

    #[error("Invalid comment '{0}': comments must fit on one line")]
    InvalidComment(String),

    #[error("Section '{0}' already exists")]
    DuplicateSection(String),

    #[error("Entry '{entry}' already exists in section '{section}'")]
    DuplicateEntry { section: String, entry: String },

    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Entry '{entry}' not found in section '{section}'")]
    EntryNotFound { section: String, entry: String },

    #[error("Index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Inconsistent document: {0}")]
    Inconsistent(String),

    #[error("Failed to access {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Refusing to overwrite existing file {0}")]
    FileExists(PathBuf),

    #[error("Document has no file path; call .set_path() or use .save_to()")]
    NoPath,

    #[error("Invalid key '{0}' (expected section.entry)")]
    InvalidKey(String),

    #[error("Settings error: {0}")]
    SettingsError(#[from] confique::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_formats_line_and_kind() {
        let err = DosconfError::Parse {
            line: 7,
            kind: ParseErrorKind::MalformedEntry("machine".into()),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 7"));
        assert!(msg.contains("machine"));
    }

    #[test]
    fn duplicate_entry_formats() {
        let err = DosconfError::DuplicateEntry {
            section: "sdl".into(),
            entry: "fullscreen".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("sdl"));
        assert!(msg.contains("fullscreen"));
    }

    #[test]
    fn file_exists_formats() {
        let err = DosconfError::FileExists("/tmp/dosbox.conf".into());
        assert!(err.to_string().contains("dosbox.conf"));
    }

    #[test]
    fn no_path_mentions_fix() {
        assert!(DosconfError::NoPath.to_string().contains("save_to"));
    }
}
