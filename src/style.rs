//! Formatting dialect, newline convention and the characters of the grammar.
//!
//! The dialect is inferred while reading and reapplied while writing, so a
//! file comes back out the way it went in. Both flags are independent.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Starts a comment line.
pub const COMMENT_CHAR: char = '#';
/// Separates an entry name from its value.
pub const ASSIGN_CHAR: char = '=';
/// Opens a section header.
pub const SECTION_OPEN: char = '[';
/// Closes a section header.
pub const SECTION_CLOSE: char = ']';

/// Section whose empty body is still followed by a blank line on write.
pub(crate) const AUTOEXEC_SECTION: &str = "autoexec";

/// Bitset of optional formatting toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Style(u8);

impl Style {
    /// `name=value`, no decoration.
    pub const NONE: Style = Style(0);
    /// Pad entry names with spaces up to the longest name in the section,
    /// then write ` = ` between name and value.
    pub const PAD_NAMES: Style = Style(1);
    /// Insert one blank line between a section's comments and its first entry.
    pub const BLANK_AFTER_COMMENTS: Style = Style(1 << 1);

    pub fn contains(self, other: Style) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Style) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Style) {
        self.0 &= !other.0;
    }

    /// Set or clear `flag` depending on `on`.
    pub fn set(&mut self, flag: Style, on: bool) {
        if on {
            self.insert(flag);
        } else {
            self.remove(flag);
        }
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Style {
    type Output = Style;

    fn bitor(self, rhs: Style) -> Style {
        Style(self.0 | rhs.0)
    }
}

impl BitOrAssign for Style {
    fn bitor_assign(&mut self, rhs: Style) {
        self.insert(rhs);
    }
}

/// Line terminator used uniformly throughout one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Newline {
    /// `\n`
    #[default]
    Unix,
    /// `\r\n`
    Windows,
}

impl Newline {
    pub fn as_str(self) -> &'static str {
        match self {
            Newline::Unix => "\n",
            Newline::Windows => "\r\n",
        }
    }

    /// Look at the first CR or LF byte only. `None` when the input holds no
    /// line break at all.
    pub fn detect(bytes: &[u8]) -> Option<Newline> {
        bytes.iter().find_map(|b| match b {
            b'\r' => Some(Newline::Windows),
            b'\n' => Some(Newline::Unix),
            _ => None,
        })
    }
}

impl fmt::Display for Newline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Newline::Unix => "unix".fmt(f),
            Newline::Windows => "windows".fmt(f),
        }
    }
}

impl FromStr for Newline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unix" | "lf" => Ok(Newline::Unix),
            "windows" | "crlf" => Ok(Newline::Windows),
            other => Err(format!("unknown newline '{other}' (expected unix or windows)")),
        }
    }
}

fn has_line_break(s: &str) -> bool {
    s.contains(['\r', '\n'])
}

/// Non-empty, and free of `#`, `[`, `]`, CR and LF.
pub fn is_valid_section_name(name: &str) -> bool {
    !name.is_empty()
        && !has_line_break(name)
        && !name.contains([COMMENT_CHAR, SECTION_OPEN, SECTION_CLOSE])
}

/// Non-empty, free of `#`, `=`, `[`, `]`, CR and LF, and without surrounding
/// whitespace (the reader trims it away).
pub fn is_valid_entry_name(name: &str) -> bool {
    !name.is_empty()
        && name.trim() == name
        && !has_line_break(name)
        && !name.contains([COMMENT_CHAR, ASSIGN_CHAR, SECTION_OPEN, SECTION_CLOSE])
}

/// On one line and without surrounding whitespace; may be empty.
pub fn is_valid_entry_value(value: &str) -> bool {
    value.trim() == value && !has_line_break(value)
}

/// Comment lines only have to stay on one line.
pub fn is_single_line(text: &str) -> bool {
    !has_line_break(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_flags_are_independent() {
        let mut style = Style::NONE;
        assert!(style.is_empty());

        style |= Style::PAD_NAMES;
        assert!(style.contains(Style::PAD_NAMES));
        assert!(!style.contains(Style::BLANK_AFTER_COMMENTS));

        style.set(Style::BLANK_AFTER_COMMENTS, true);
        style.remove(Style::PAD_NAMES);
        assert_eq!(style, Style::BLANK_AFTER_COMMENTS);
    }

    #[test]
    fn detect_windows_when_cr_comes_first() {
        assert_eq!(Newline::detect(b"[a]\r\nx=1"), Some(Newline::Windows));
    }

    #[test]
    fn detect_unix_when_lf_comes_first() {
        assert_eq!(Newline::detect(b"[a]\nx=1\r\n"), Some(Newline::Unix));
    }

    #[test]
    fn detect_nothing_without_breaks() {
        assert_eq!(Newline::detect(b"[a]"), None);
    }

    #[test]
    fn section_name_rules() {
        assert!(is_valid_section_name("dosbox"));
        assert!(is_valid_section_name("render = x"));
        assert!(!is_valid_section_name(""));
        assert!(!is_valid_section_name("a]b"));
        assert!(!is_valid_section_name("a#b"));
        assert!(!is_valid_section_name("a\nb"));
    }

    #[test]
    fn entry_name_rules() {
        assert!(is_valid_entry_name("machine"));
        assert!(is_valid_entry_name("set path"));
        assert!(!is_valid_entry_name(""));
        assert!(!is_valid_entry_name("a=b"));
        assert!(!is_valid_entry_name(" padded"));
        assert!(!is_valid_entry_name("[x"));
        assert!(!is_valid_entry_name("x\r"));
    }

    #[test]
    fn entry_value_rules() {
        assert!(is_valid_entry_value(""));
        assert!(is_valid_entry_value("mount c ~/dos"));
        assert!(is_valid_entry_value("a=b#c"));
        assert!(!is_valid_entry_value(" auto "));
        assert!(!is_valid_entry_value("auto\t"));
        assert!(!is_valid_entry_value("a\nb"));
    }

    #[test]
    fn newline_from_str() {
        assert_eq!("CRLF".parse::<Newline>(), Ok(Newline::Windows));
        assert_eq!("unix".parse::<Newline>(), Ok(Newline::Unix));
        assert!("mac".parse::<Newline>().is_err());
    }

    #[test]
    fn newline_deserializes_lowercase() {
        let n: Newline = serde_json::from_str("\"windows\"").unwrap();
        assert_eq!(n, Newline::Windows);
        assert_eq!(n.as_str(), "\r\n");
    }
}
