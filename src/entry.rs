//! A single `name=value` line.

use std::fmt;
use std::ops::Deref;

use crate::error::DosconfError;
use crate::events::{ChangeEvent, Observers};
use crate::ids::SectionId;
use crate::named_map::Named;
use crate::section::Section;
use crate::style::{self, ASSIGN_CHAR, Newline, Style};

/// A name/value pair owned by at most one [`Section`].
///
/// An entry built with [`Entry::new`] is detached. Adding it to a section
/// records that section's id as its parent; removing it, or removing its
/// section from a document, clears the parent again. The name can only
/// change through the owning section, which keeps its name index in step.
#[derive(Debug)]
pub struct Entry {
    name: String,
    value: String,
    parent: Option<SectionId>,
}

impl Entry {
    /// Any name is accepted here; see [`Entry::is_valid`].
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            parent: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// The owning section, if any.
    pub fn section_id(&self) -> Option<SectionId> {
        self.parent
    }

    /// Returns the previous value.
    pub fn set_value(&mut self, value: impl Into<String>) -> String {
        std::mem::replace(&mut self.value, value.into())
    }

    pub fn clear_value(&mut self) -> String {
        std::mem::take(&mut self.value)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn validate(&self) -> Result<(), DosconfError> {
        if !style::is_valid_entry_name(&self.name) {
            return Err(DosconfError::InvalidEntryName(self.name.clone()));
        }
        if !style::is_valid_entry_value(&self.value) {
            return Err(DosconfError::InvalidEntryValue {
                name: self.name.clone(),
            });
        }
        Ok(())
    }

    /// Parse `name=value`, splitting at the first `=` and trimming both
    /// halves. Returns `None` when there is no `=`.
    ///
    /// When `dialect` is given, whitespace before the `=` marks it with
    /// [`Style::PAD_NAMES`].
    pub fn parse(line: &str, dialect: Option<&mut Style>) -> Option<Entry> {
        let (name, value) = line.split_once(ASSIGN_CHAR)?;
        if let Some(dialect) = dialect
            && name.ends_with(char::is_whitespace)
        {
            dialect.insert(Style::PAD_NAMES);
        }
        Some(Entry::new(name.trim(), value.trim()))
    }

    /// Append this entry as one line. With [`Style::PAD_NAMES`] the name is
    /// padded to `name_width` characters and followed by ` =`, plus a space
    /// when there is a value.
    pub fn write_to(
        &self,
        out: &mut String,
        style: Style,
        name_width: usize,
        newline: Newline,
    ) -> Result<(), DosconfError> {
        self.validate()?;
        if style.contains(Style::PAD_NAMES) {
            out.push_str(&format!("{:<name_width$} {ASSIGN_CHAR}", self.name));
            if !self.value.is_empty() {
                out.push(' ');
            }
        } else {
            out.push_str(&self.name);
            out.push(ASSIGN_CHAR);
        }
        out.push_str(&self.value);
        out.push_str(newline.as_str());
        Ok(())
    }

    pub(crate) fn attach(&mut self, section: SectionId) {
        self.parent = Some(section);
    }

    pub(crate) fn detach(&mut self) {
        self.parent = None;
    }
}

/// Clones are detached.
impl Clone for Entry {
    fn clone(&self) -> Self {
        Entry::new(self.name.clone(), self.value.clone())
    }
}

/// Structural: name and value only.
impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value
    }
}

impl Eq for Entry {}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{ASSIGN_CHAR}{}", self.name, self.value)
    }
}

impl Named for Entry {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn key_for(name: &str) -> String {
        name.to_string()
    }
}

/// Mutable handle on an entry inside a document. Renames and removal are
/// routed to the owning section; every change is reported to the
/// document's observers.
pub struct EntryMut<'a> {
    section: &'a mut Section,
    observers: &'a mut Observers,
    index: usize,
}

impl<'a> EntryMut<'a> {
    pub(crate) fn new(section: &'a mut Section, observers: &'a mut Observers, index: usize) -> Self {
        Self {
            section,
            observers,
            index,
        }
    }

    /// Position within the section.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn rename(&mut self, new_name: impl Into<String>) -> Result<(), DosconfError> {
        let new_name = new_name.into();
        let old_name = self.section.rename_entry_at(self.index, new_name.clone())?;
        let index = self.index;
        let section = &*self.section;
        self.observers.emit_with(|| ChangeEvent::EntryRenamed {
            section: section.name().to_string(),
            index,
            old_name,
            new_name,
        });
        Ok(())
    }

    /// Returns the previous value.
    pub fn set_value(&mut self, value: impl Into<String>) -> String {
        let index = self.index;
        let new_value = value.into();
        let old_value = self.section.entries[index].set_value(new_value.clone());
        if old_value != new_value {
            let section = &*self.section;
            let reported = old_value.clone();
            self.observers.emit_with(|| ChangeEvent::EntryValueChanged {
                section: section.name().to_string(),
                index,
                name: section.entries[index].name().to_string(),
                old_value: reported,
                new_value,
            });
        }
        old_value
    }

    pub fn clear_value(&mut self) -> String {
        self.set_value(String::new())
    }

    /// Detach the entry from its section and hand it back.
    pub fn remove(self) -> Result<Entry, DosconfError> {
        let entry = self.section.remove_entry_at(self.index)?;
        let section = &*self.section;
        let index = self.index;
        self.observers.emit_with(|| ChangeEvent::EntryRemoved {
            section: section.name().to_string(),
            index,
            name: entry.name().to_string(),
        });
        Ok(entry)
    }
}

impl Deref for EntryMut<'_> {
    type Target = Entry;

    fn deref(&self) -> &Entry {
        &self.section.entries[self.index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_at_first_assign() {
        let e = Entry::parse("path = C:\\GAME=1", None).unwrap();
        assert_eq!(e.name(), "path");
        assert_eq!(e.value(), "C:\\GAME=1");
    }

    #[test]
    fn parse_trims_both_sides() {
        let e = Entry::parse("  machine  =   svga_s3  ", None).unwrap();
        assert_eq!(e, Entry::new("machine", "svga_s3"));
    }

    #[test]
    fn parse_without_assign_fails() {
        assert!(Entry::parse("mount c .", None).is_none());
    }

    #[test]
    fn parse_empty_value() {
        let e = Entry::parse("captures=", None).unwrap();
        assert_eq!(e.value(), "");
        assert!(e.is_valid());
    }

    #[test]
    fn parse_records_padding_dialect() {
        let mut style = Style::NONE;
        Entry::parse("rate=44100", Some(&mut style)).unwrap();
        assert!(!style.contains(Style::PAD_NAMES));
        Entry::parse("rate   = 44100", Some(&mut style)).unwrap();
        assert!(style.contains(Style::PAD_NAMES));
    }

    #[test]
    fn parsed_empty_name_is_invalid() {
        let e = Entry::parse("=value", None).unwrap();
        assert!(!e.is_valid());
        assert!(matches!(
            e.validate(),
            Err(DosconfError::InvalidEntryName(_))
        ));
    }

    #[test]
    fn write_plain() {
        let mut out = String::new();
        Entry::new("cycles", "auto")
            .write_to(&mut out, Style::NONE, 20, Newline::Unix)
            .unwrap();
        assert_eq!(out, "cycles=auto\n");
    }

    #[test]
    fn write_padded() {
        let mut out = String::new();
        Entry::new("core", "auto")
            .write_to(&mut out, Style::PAD_NAMES, 8, Newline::Windows)
            .unwrap();
        assert_eq!(out, "core     = auto\r\n");
    }

    #[test]
    fn write_padded_empty_value_has_no_trailing_space() {
        let mut out = String::new();
        Entry::new("c", "")
            .write_to(&mut out, Style::PAD_NAMES, 3, Newline::Unix)
            .unwrap();
        assert_eq!(out, "c   =\n");
    }

    #[test]
    fn write_invalid_fails_without_output() {
        let mut out = String::new();
        let result = Entry::new("a=b", "c").write_to(&mut out, Style::NONE, 0, Newline::Unix);
        assert!(result.is_err());
        assert!(out.is_empty());

        let result = Entry::new("a", "line\nbreak").write_to(&mut out, Style::NONE, 0, Newline::Unix);
        assert!(matches!(result, Err(DosconfError::InvalidEntryValue { .. })));
    }

    #[test]
    fn value_with_surrounding_whitespace_is_invalid() {
        let e = Entry::new("cycles", " auto ");
        assert!(matches!(
            e.validate(),
            Err(DosconfError::InvalidEntryValue { .. })
        ));
        assert!(Entry::new("autoexec", "mount c ~/dos").is_valid());
    }

    #[test]
    fn equality_ignores_parent() {
        let mut a = Entry::new("x", "1");
        a.attach(SectionId::fresh());
        let b = a.clone();
        assert_eq!(a, b);
        assert!(b.section_id().is_none());
        assert_ne!(a, Entry::new("x", "2"));
    }

    #[test]
    fn value_mutators() {
        let mut e = Entry::new("x", "1");
        assert_eq!(e.set_value("2"), "1");
        assert_eq!(e.clear_value(), "2");
        assert_eq!(e.value(), "");
    }
}
