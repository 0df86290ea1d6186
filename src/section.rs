//! Named group of entries with its own comment block.
//!
//! A [`Section`] on its own is a plain value: build one, fill it, then hand
//! it to a [`Document`](crate::Document). Once owned by a document it is
//! only reachable mutably through [`SectionMut`], which routes renames and
//! removal back to the document and reports every change to its observers.

use std::ops::Deref;

use crate::comments::{Comments, CommentsMut};
use crate::entry::{Entry, EntryMut};
use crate::error::{DosconfError, ParseErrorKind};
use crate::events::{ChangeEvent, CommentScope, Observers};
use crate::ids::{DocumentId, SectionId};
use crate::named_map::{Named, NamedMap};
use crate::parse::{self, LineReader};
use crate::style::{self, AUTOEXEC_SECTION, COMMENT_CHAR, Newline, SECTION_CLOSE, SECTION_OPEN, Style};

#[derive(Debug)]
pub struct Section {
    id: SectionId,
    name: String,
    pub(crate) entries: NamedMap<Entry>,
    comments: Comments,
    parent: Option<DocumentId>,
}

impl Section {
    /// Any name is accepted here; see [`Section::is_valid`].
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SectionId::fresh(),
            name: name.into(),
            entries: NamedMap::new(),
            comments: Comments::new(),
            parent: None,
        }
    }

    pub fn id(&self) -> SectionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The owning document, if any.
    pub fn document_id(&self) -> Option<DocumentId> {
        self.parent
    }

    pub fn comments(&self) -> &Comments {
        &self.comments
    }

    pub fn comments_mut(&mut self) -> &mut Comments {
        &mut self.comments
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &Entry> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    pub fn entry_at(&self, index: usize) -> Option<&Entry> {
        self.entries.get_index(index)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.entry(name).map(Entry::value)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.index_of(name)
    }

    /// Position of this exact entry instance (not merely an equal one).
    pub fn position_of(&self, entry: &Entry) -> Option<usize> {
        self.entries.position_of(entry)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains(name)
    }

    fn check_new_entry(&self, entry: &Entry) -> Result<(), DosconfError> {
        if !style::is_valid_entry_name(entry.name()) {
            return Err(DosconfError::InvalidEntryName(entry.name().to_string()));
        }
        Ok(())
    }

    fn duplicate(&self, entry: &str) -> DosconfError {
        DosconfError::DuplicateEntry {
            section: self.name.clone(),
            entry: entry.to_string(),
        }
    }

    fn not_found(&self, entry: &str) -> DosconfError {
        DosconfError::EntryNotFound {
            section: self.name.clone(),
            entry: entry.to_string(),
        }
    }

    fn out_of_range(&self, index: usize) -> DosconfError {
        DosconfError::IndexOutOfRange {
            index,
            len: self.entries.len(),
        }
    }

    /// Append an entry and take ownership of it. Returns its index.
    ///
    /// On failure the entry is dropped; clone it first to keep a copy.
    pub fn add_entry(&mut self, mut entry: Entry) -> Result<usize, DosconfError> {
        self.check_new_entry(&entry)?;
        entry.attach(self.id);
        self.entries
            .push(entry)
            .map_err(|rejected| self.duplicate(rejected.name()))
    }

    /// Build and append `name=value`. Returns its index.
    pub fn new_entry(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<usize, DosconfError> {
        self.add_entry(Entry::new(name, value))
    }

    /// Insert before `index`; `index == len()` appends. On failure the entry
    /// is dropped.
    pub fn insert_entry(&mut self, index: usize, mut entry: Entry) -> Result<(), DosconfError> {
        self.check_new_entry(&entry)?;
        if index > self.entries.len() {
            return Err(self.out_of_range(index));
        }
        entry.attach(self.id);
        self.entries
            .insert_at(index, entry)
            .map_err(|rejected| self.duplicate(rejected.name()))
    }

    /// Swap the entry at `index` for `entry`; the old one is detached and
    /// returned. On failure `entry` is dropped and the old one stays.
    pub fn replace_entry(&mut self, index: usize, mut entry: Entry) -> Result<Entry, DosconfError> {
        self.check_new_entry(&entry)?;
        if index >= self.entries.len() {
            return Err(self.out_of_range(index));
        }
        entry.attach(self.id);
        let mut old = self
            .entries
            .replace_at(index, entry)
            .map_err(|rejected| self.duplicate(rejected.name()))?;
        old.detach();
        Ok(old)
    }

    pub fn remove_entry(&mut self, name: &str) -> Result<Entry, DosconfError> {
        let index = self.index_of(name).ok_or_else(|| self.not_found(name))?;
        self.remove_entry_at(index)
    }

    pub fn remove_entry_at(&mut self, index: usize) -> Result<Entry, DosconfError> {
        let mut entry = self
            .entries
            .remove_at(index)
            .ok_or_else(|| self.out_of_range(index))?;
        entry.detach();
        Ok(entry)
    }

    /// Returns the entry's index.
    pub fn rename_entry(
        &mut self,
        name: &str,
        new_name: impl Into<String>,
    ) -> Result<usize, DosconfError> {
        let index = self.index_of(name).ok_or_else(|| self.not_found(name))?;
        self.rename_entry_at(index, new_name.into())?;
        Ok(index)
    }

    /// Returns the old name.
    pub(crate) fn rename_entry_at(
        &mut self,
        index: usize,
        new_name: String,
    ) -> Result<String, DosconfError> {
        if !style::is_valid_entry_name(&new_name) {
            return Err(DosconfError::InvalidEntryName(new_name));
        }
        if index >= self.entries.len() {
            return Err(self.out_of_range(index));
        }
        self.entries
            .rename_at(index, new_name)
            .map_err(|taken| self.duplicate(&taken))
    }

    /// Set the value of `name`, adding the entry when it does not exist.
    /// Returns the previous value, or `None` when the entry was added.
    pub fn set_value(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<Option<String>, DosconfError> {
        match self.index_of(name) {
            Some(index) => Ok(Some(self.entries[index].set_value(value))),
            None => {
                self.new_entry(name, value)?;
                Ok(None)
            }
        }
    }

    /// Returns the previous value.
    pub fn clear_value(&mut self, name: &str) -> Result<String, DosconfError> {
        let index = self.index_of(name).ok_or_else(|| self.not_found(name))?;
        Ok(self.entries[index].clear_value())
    }

    /// Remove and detach every entry.
    pub fn clear_entries(&mut self) -> Vec<Entry> {
        self.entries
            .drain()
            .map(|mut e| {
                e.detach();
                e
            })
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check the name, every entry, every comment, and that the entry index
    /// and back-references agree with this section.
    pub fn validate(&self) -> Result<(), DosconfError> {
        if !style::is_valid_section_name(&self.name) {
            return Err(DosconfError::InvalidSectionName(self.name.clone()));
        }
        if !self.entries.is_consistent() {
            return Err(DosconfError::Inconsistent(format!(
                "entry index of section '{}' is out of step with its entries",
                self.name
            )));
        }
        // Entries of a section removed from a document are detached with it.
        let detached_ok = self.parent.is_none();
        for entry in self.entries.iter() {
            entry.validate()?;
            let parent = entry.section_id();
            if parent != Some(self.id) && !(detached_ok && parent.is_none()) {
                return Err(DosconfError::Inconsistent(format!(
                    "entry '{}' does not point back at section '{}'",
                    entry.name(),
                    self.name
                )));
            }
        }
        if let Some(bad) = self.comments.iter().find(|c| !style::is_single_line(c)) {
            return Err(DosconfError::InvalidComment(bad.to_string()));
        }
        Ok(())
    }

    /// Read one section starting at its header line. Stops before the next
    /// header without consuming it, so the caller resumes there.
    pub(crate) fn read_from(
        lines: &mut LineReader<'_>,
        dialect: &mut Style,
    ) -> Result<Section, DosconfError> {
        let Some((line_no, raw)) = lines.next() else {
            return Err(DosconfError::Inconsistent(
                "section reader started past the end of input".into(),
            ));
        };
        let header = raw.trim();
        let Some(name) = parse::header_name(header) else {
            return Err(DosconfError::Parse {
                line: line_no,
                kind: ParseErrorKind::OutsideSection(header.to_string()),
            });
        };
        if !style::is_valid_section_name(name) {
            return Err(DosconfError::Parse {
                line: line_no,
                kind: ParseErrorKind::InvalidSectionName(name.to_string()),
            });
        }

        let mut section = Section::new(name);
        let mut blank_after_comments = false;

        while let Some((line_no, raw)) = lines.peek() {
            let line = raw.trim();
            if parse::header_name(line).is_some() {
                break;
            }
            lines.next();

            if line.is_empty() {
                if !section.comments.is_empty() && section.entries.is_empty() {
                    blank_after_comments = true;
                }
                continue;
            }
            // Trailing whitespace belongs to the comment text.
            if let Some(text) = parse::comment_text(raw.trim_start()) {
                section.comments.push(text);
                blank_after_comments = false;
                continue;
            }

            let Some(entry) = Entry::parse(line, Some(&mut *dialect)) else {
                return Err(DosconfError::Parse {
                    line: line_no,
                    kind: ParseErrorKind::MalformedEntry(line.to_string()),
                });
            };
            if !style::is_valid_entry_name(entry.name()) {
                return Err(DosconfError::Parse {
                    line: line_no,
                    kind: ParseErrorKind::InvalidEntryName(entry.name().to_string()),
                });
            }
            if blank_after_comments && section.entries.is_empty() {
                dialect.insert(Style::BLANK_AFTER_COMMENTS);
            }
            let entry_name = entry.name().to_string();
            if section.add_entry(entry).is_err() {
                return Err(DosconfError::Parse {
                    line: line_no,
                    kind: ParseErrorKind::DuplicateEntry(entry_name),
                });
            }
        }

        Ok(section)
    }

    /// Append the header, comments and entries of this section.
    pub fn write_to(
        &self,
        out: &mut String,
        style: Style,
        newline: Newline,
    ) -> Result<(), DosconfError> {
        self.validate()?;
        let nl = newline.as_str();

        out.push(SECTION_OPEN);
        out.push_str(&self.name);
        out.push(SECTION_CLOSE);
        out.push_str(nl);

        for comment in self.comments.iter() {
            out.push(COMMENT_CHAR);
            if !comment.is_empty() {
                out.push(' ');
                out.push_str(comment);
            }
            out.push_str(nl);
        }

        if style.contains(Style::BLANK_AFTER_COMMENTS)
            && !self.comments.is_empty()
            && !self.entries.is_empty()
        {
            out.push_str(nl);
        }

        let width = self
            .entries
            .iter()
            .map(|e| e.name().chars().count())
            .max()
            .unwrap_or(0);
        for entry in self.entries.iter() {
            entry.write_to(out, style, width, newline)?;
        }

        // The emulator expects an empty [autoexec] block to end with a blank line.
        if self.entries.is_empty() && self.name.eq_ignore_ascii_case(AUTOEXEC_SECTION) {
            out.push_str(nl);
        }
        Ok(())
    }

    /// Attach to `document` and point every entry back at this section.
    pub(crate) fn attach(&mut self, document: DocumentId) {
        self.parent = Some(document);
        let id = self.id;
        for entry in self.entries.iter_mut() {
            entry.attach(id);
        }
    }

    /// Detach from the document along with every entry.
    pub(crate) fn detach(&mut self) {
        self.parent = None;
        for entry in self.entries.iter_mut() {
            entry.detach();
        }
    }
}

/// Clones are detached and get a fresh id; their entries point at the clone.
impl Clone for Section {
    fn clone(&self) -> Self {
        let id = SectionId::fresh();
        let mut entries = self.entries.clone();
        for entry in entries.iter_mut() {
            entry.attach(id);
        }
        Self {
            id,
            name: self.name.clone(),
            entries,
            comments: self.comments.clone(),
            parent: None,
        }
    }
}

/// Structural: name (ignoring ASCII case), entries in order, comments.
impl PartialEq for Section {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
            && self.entries.iter().eq(other.entries.iter())
            && self.comments == other.comments
    }
}

impl Eq for Section {}

impl Named for Section {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn key_for(name: &str) -> String {
        name.to_ascii_lowercase()
    }
}

/// Mutable handle on a section owned by a document.
pub struct SectionMut<'a> {
    pub(crate) sections: &'a mut NamedMap<Section>,
    pub(crate) observers: &'a mut Observers,
    pub(crate) index: usize,
}

impl<'a> SectionMut<'a> {
    pub(crate) fn new(
        sections: &'a mut NamedMap<Section>,
        observers: &'a mut Observers,
        index: usize,
    ) -> Self {
        Self {
            sections,
            observers,
            index,
        }
    }

    /// Position within the document.
    pub fn index(&self) -> usize {
        self.index
    }

    fn section(&mut self) -> &mut Section {
        &mut self.sections[self.index]
    }

    /// Report an event that needs the section's current name.
    fn emit(&mut self, make: impl FnOnce(String) -> ChangeEvent) {
        let section = &self.sections[self.index];
        self.observers.emit_with(|| make(section.name.clone()));
    }

    /// Rename this section. The new name must be valid and must not match
    /// any sibling (ignoring ASCII case); a case-only change is allowed.
    pub fn rename(&mut self, new_name: impl Into<String>) -> Result<(), DosconfError> {
        let new_name = new_name.into();
        if !style::is_valid_section_name(&new_name) {
            return Err(DosconfError::InvalidSectionName(new_name));
        }
        let old_name = self
            .sections
            .rename_at(self.index, new_name)
            .map_err(DosconfError::DuplicateSection)?;
        let index = self.index;
        self.emit(|new_name| ChangeEvent::SectionRenamed {
            index,
            old_name,
            new_name,
        });
        Ok(())
    }

    /// Detach this section and its entries from the document and hand it
    /// back.
    pub fn remove(self) -> Result<Section, DosconfError> {
        let len = self.sections.len();
        let mut section = self
            .sections
            .remove_at(self.index)
            .ok_or(DosconfError::IndexOutOfRange {
                index: self.index,
                len,
            })?;
        section.detach();
        let index = self.index;
        let name = section.name.clone();
        self.observers
            .emit_with(|| ChangeEvent::SectionRemoved { index, name });
        Ok(section)
    }

    pub fn comments_mut(&mut self) -> CommentsMut<'_> {
        let section = &mut self.sections[self.index];
        let scope = CommentScope::Section {
            name: section.name.clone(),
        };
        CommentsMut::new(&mut section.comments, self.observers, scope)
    }

    pub fn entry_mut(&mut self, name: &str) -> Option<EntryMut<'_>> {
        let index = self.index_of(name)?;
        self.entry_mut_at(index)
    }

    pub fn entry_mut_at(&mut self, index: usize) -> Option<EntryMut<'_>> {
        let section = &mut self.sections[self.index];
        if index >= section.entries.len() {
            return None;
        }
        Some(EntryMut::new(section, self.observers, index))
    }

    pub fn add_entry(&mut self, entry: Entry) -> Result<usize, DosconfError> {
        let index = self.section().add_entry(entry)?;
        self.emit_entry_added(index, false);
        Ok(index)
    }

    pub fn new_entry(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<usize, DosconfError> {
        self.add_entry(Entry::new(name, value))
    }

    pub fn insert_entry(&mut self, index: usize, entry: Entry) -> Result<(), DosconfError> {
        self.section().insert_entry(index, entry)?;
        self.emit_entry_added(index, true);
        Ok(())
    }

    fn emit_entry_added(&mut self, index: usize, inserted: bool) {
        let owner = &self.sections[self.index];
        self.observers.emit_with(|| {
            let entry = &owner.entries[index];
            let (section, name, value) = (
                owner.name.clone(),
                entry.name().to_string(),
                entry.value().to_string(),
            );
            if inserted {
                ChangeEvent::EntryInserted {
                    section,
                    index,
                    name,
                    value,
                }
            } else {
                ChangeEvent::EntryAdded {
                    section,
                    index,
                    name,
                    value,
                }
            }
        });
    }

    pub fn replace_entry(&mut self, index: usize, entry: Entry) -> Result<Entry, DosconfError> {
        let new_name = entry.name().to_string();
        let old = self.section().replace_entry(index, entry)?;
        let old_name = old.name().to_string();
        self.emit(|section| ChangeEvent::EntryReplaced {
            section,
            index,
            old_name,
            new_name,
        });
        Ok(old)
    }

    pub fn remove_entry(&mut self, name: &str) -> Result<Entry, DosconfError> {
        let index = self
            .index_of(name)
            .ok_or_else(|| self.sections[self.index].not_found(name))?;
        self.remove_entry_at(index)
    }

    pub fn remove_entry_at(&mut self, index: usize) -> Result<Entry, DosconfError> {
        let entry = self.section().remove_entry_at(index)?;
        let name = entry.name().to_string();
        self.emit(|section| ChangeEvent::EntryRemoved {
            section,
            index,
            name,
        });
        Ok(entry)
    }

    pub fn rename_entry(
        &mut self,
        name: &str,
        new_name: impl Into<String>,
    ) -> Result<(), DosconfError> {
        let not_found = self.sections[self.index].not_found(name);
        let mut entry = self.entry_mut(name).ok_or(not_found)?;
        entry.rename(new_name)
    }

    /// Set or add `name=value`.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> Result<(), DosconfError> {
        match self.index_of(name) {
            Some(index) => {
                if let Some(mut entry) = self.entry_mut_at(index) {
                    entry.set_value(value);
                }
                Ok(())
            }
            None => self.new_entry(name, value).map(|_| ()),
        }
    }

    pub fn clear_value(&mut self, name: &str) -> Result<(), DosconfError> {
        let not_found = self.sections[self.index].not_found(name);
        let mut entry = self.entry_mut(name).ok_or(not_found)?;
        entry.clear_value();
        Ok(())
    }

    pub fn clear_entries(&mut self) -> Vec<Entry> {
        let removed = self.section().clear_entries();
        if !removed.is_empty() {
            self.emit(|section| ChangeEvent::EntriesCleared { section });
        }
        removed
    }
}

impl Deref for SectionMut<'_> {
    type Target = Section;

    fn deref(&self) -> &Section {
        &self.sections[self.index]
    }
}
