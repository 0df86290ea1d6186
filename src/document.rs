//! The root aggregate: leading comments plus an ordered set of sections.
//!
//! A [`Document`] owns every section, and through them every entry. All
//! structural changes go through the document (or a [`SectionMut`] /
//! [`EntryMut`](crate::EntryMut) handle borrowed from it), which keeps the
//! name indexes and back-references consistent and reports each change to
//! the subscribed observers.
//!
//! # Reading
//!
//! [`Document::parse`] detects the newline convention from the first line
//! break, then reads line by line: blank lines are skipped, comment lines
//! before the first header become document comments, and every header
//! hands over to the section reader until the next header. Any malformed
//! line fails the whole parse.
//!
//! # Writing
//!
//! [`Document::serialize`] writes the document comments, a blank line, then
//! each section separated by exactly one blank line, using the dialect and
//! newline detected on read unless overridden.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::comments::{Comments, CommentsMut};
use crate::entry::Entry;
use crate::error::{DosconfError, ParseErrorKind};
use crate::events::{ChangeEvent, CommentScope, Observer, ObserverId, Observers};
use crate::ids::DocumentId;
use crate::named_map::NamedMap;
use crate::parse::{self, LineReader};
use crate::section::{Section, SectionMut};
use crate::style::{self, COMMENT_CHAR, Newline, Style};

/// Picks a section by name (ignoring ASCII case) or by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionSelector<'a> {
    Name(&'a str),
    Index(usize),
}

impl<'a> From<&'a str> for SectionSelector<'a> {
    fn from(name: &'a str) -> Self {
        SectionSelector::Name(name)
    }
}

impl<'a> From<&'a String> for SectionSelector<'a> {
    fn from(name: &'a String) -> Self {
        SectionSelector::Name(name)
    }
}

impl From<usize> for SectionSelector<'_> {
    fn from(index: usize) -> Self {
        SectionSelector::Index(index)
    }
}

#[derive(Debug)]
pub struct Document {
    id: DocumentId,
    comments: Comments,
    pub(crate) sections: NamedMap<Section>,
    style: Style,
    newline: Newline,
    path: Option<PathBuf>,
    pub(crate) observers: Observers,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            id: DocumentId::fresh(),
            comments: Comments::new(),
            sections: NamedMap::new(),
            style: Style::NONE,
            newline: Newline::default(),
            path: None,
            observers: Observers::default(),
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_newline(mut self, newline: Newline) -> Self {
        self.newline = newline;
        self
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Dialect used by [`serialize`](Self::serialize) when none is given.
    pub fn style(&self) -> Style {
        self.style
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn newline(&self) -> Newline {
        self.newline
    }

    pub fn set_newline(&mut self, newline: Newline) {
        self.newline = newline;
    }

    /// The file this document was loaded from or last saved to.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    // --- observers ---

    pub fn subscribe(&mut self, observer: impl Observer + 'static) -> ObserverId {
        self.observers.subscribe(Box::new(observer))
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    // --- comments ---

    pub fn comments(&self) -> &Comments {
        &self.comments
    }

    pub fn comments_mut(&mut self) -> CommentsMut<'_> {
        CommentsMut::new(
            &mut self.comments,
            &mut self.observers,
            CommentScope::Document,
        )
    }

    // --- section lookup ---

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn sections(&self) -> impl DoubleEndedIterator<Item = &Section> + ExactSizeIterator {
        self.sections.iter()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn section_at(&self, index: usize) -> Option<&Section> {
        self.sections.get_index(index)
    }

    pub fn index_of_section(&self, name: &str) -> Option<usize> {
        self.sections.index_of(name)
    }

    /// Position of this exact section instance (not merely an equal one).
    pub fn position_of(&self, section: &Section) -> Option<usize> {
        self.sections.position_of(section)
    }

    pub fn contains_section(&self, name: &str) -> bool {
        self.sections.contains(name)
    }

    fn resolve<'s>(&self, selector: impl Into<SectionSelector<'s>>) -> Result<usize, DosconfError> {
        match selector.into() {
            SectionSelector::Name(name) => self
                .sections
                .index_of(name)
                .ok_or_else(|| DosconfError::SectionNotFound(name.to_string())),
            SectionSelector::Index(index) if index < self.sections.len() => Ok(index),
            SectionSelector::Index(index) => Err(DosconfError::IndexOutOfRange {
                index,
                len: self.sections.len(),
            }),
        }
    }

    pub fn section_mut<'s>(
        &mut self,
        selector: impl Into<SectionSelector<'s>>,
    ) -> Option<SectionMut<'_>> {
        self.handle(selector).ok()
    }

    pub fn section_mut_at(&mut self, index: usize) -> Option<SectionMut<'_>> {
        self.section_mut(index)
    }

    fn handle<'s>(
        &mut self,
        selector: impl Into<SectionSelector<'s>>,
    ) -> Result<SectionMut<'_>, DosconfError> {
        let index = self.resolve(selector)?;
        Ok(SectionMut::new(
            &mut self.sections,
            &mut self.observers,
            index,
        ))
    }

    // --- section mutation ---

    fn check_new_section(&self, section: &Section) -> Result<(), DosconfError> {
        section.validate()?;
        if self.sections.contains(section.name()) {
            return Err(DosconfError::DuplicateSection(section.name().to_string()));
        }
        Ok(())
    }

    /// Append a section and take ownership of it. Returns its index.
    ///
    /// On failure the section is dropped; clone it first to keep a copy.
    pub fn add_section(&mut self, mut section: Section) -> Result<usize, DosconfError> {
        self.check_new_section(&section)?;
        section.attach(self.id);
        let index = self
            .sections
            .push(section)
            .map_err(|rejected| DosconfError::DuplicateSection(rejected.name().to_string()))?;
        let sections = &self.sections;
        self.observers.emit_with(|| ChangeEvent::SectionAdded {
            index,
            name: sections[index].name().to_string(),
        });
        Ok(index)
    }

    /// Create an empty section at the end and return a handle to it.
    pub fn new_section(&mut self, name: impl Into<String>) -> Result<SectionMut<'_>, DosconfError> {
        let index = self.add_section(Section::new(name))?;
        self.handle(index)
    }

    /// Insert before `index`; `index == len()` appends. On failure the
    /// section is dropped.
    pub fn insert_section(&mut self, index: usize, mut section: Section) -> Result<(), DosconfError> {
        self.check_new_section(&section)?;
        if index > self.sections.len() {
            return Err(DosconfError::IndexOutOfRange {
                index,
                len: self.sections.len(),
            });
        }
        section.attach(self.id);
        self.sections
            .insert_at(index, section)
            .map_err(|rejected| DosconfError::DuplicateSection(rejected.name().to_string()))?;
        let sections = &self.sections;
        self.observers.emit_with(|| ChangeEvent::SectionInserted {
            index,
            name: sections[index].name().to_string(),
        });
        Ok(())
    }

    /// Swap the section at `index` for `section`; the old one is detached and
    /// returned. The new name may match the old one but no other sibling.
    /// On failure `section` is dropped and the old one stays in place.
    pub fn replace_section(
        &mut self,
        index: usize,
        mut section: Section,
    ) -> Result<Section, DosconfError> {
        section.validate()?;
        if index >= self.sections.len() {
            return Err(DosconfError::IndexOutOfRange {
                index,
                len: self.sections.len(),
            });
        }
        section.attach(self.id);
        let mut old = self
            .sections
            .replace_at(index, section)
            .map_err(|rejected| DosconfError::DuplicateSection(rejected.name().to_string()))?;
        old.detach();
        let sections = &self.sections;
        let old_name = old.name().to_string();
        self.observers.emit_with(|| ChangeEvent::SectionReplaced {
            index,
            old_name,
            new_name: sections[index].name().to_string(),
        });
        Ok(old)
    }

    pub fn remove_section<'s>(
        &mut self,
        selector: impl Into<SectionSelector<'s>>,
    ) -> Result<Section, DosconfError> {
        self.handle(selector)?.remove()
    }

    pub fn remove_section_at(&mut self, index: usize) -> Result<Section, DosconfError> {
        self.remove_section(index)
    }

    pub fn rename_section<'s>(
        &mut self,
        selector: impl Into<SectionSelector<'s>>,
        new_name: impl Into<String>,
    ) -> Result<(), DosconfError> {
        self.handle(selector)?.rename(new_name)
    }

    /// Drop every section and document comment.
    pub fn clear(&mut self) {
        if self.sections.is_empty() && self.comments.is_empty() {
            return;
        }
        for mut section in self.sections.drain() {
            section.detach();
        }
        self.comments.clear();
        self.observers.emit_with(|| ChangeEvent::Cleared);
    }

    // --- entry helpers ---

    pub fn value<'s>(&self, selector: impl Into<SectionSelector<'s>>, name: &str) -> Option<&str> {
        let index = self.resolve(selector).ok()?;
        self.sections[index].value(name)
    }

    /// Set or add `name=value` in an existing section.
    pub fn set_value<'s>(
        &mut self,
        selector: impl Into<SectionSelector<'s>>,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), DosconfError> {
        self.handle(selector)?.set_value(name, value)
    }

    pub fn clear_value<'s>(
        &mut self,
        selector: impl Into<SectionSelector<'s>>,
        name: &str,
    ) -> Result<(), DosconfError> {
        self.handle(selector)?.clear_value(name)
    }

    pub fn add_entry<'s>(
        &mut self,
        selector: impl Into<SectionSelector<'s>>,
        entry: Entry,
    ) -> Result<usize, DosconfError> {
        self.handle(selector)?.add_entry(entry)
    }

    pub fn insert_entry<'s>(
        &mut self,
        selector: impl Into<SectionSelector<'s>>,
        index: usize,
        entry: Entry,
    ) -> Result<(), DosconfError> {
        self.handle(selector)?.insert_entry(index, entry)
    }

    pub fn remove_entry<'s>(
        &mut self,
        selector: impl Into<SectionSelector<'s>>,
        name: &str,
    ) -> Result<Entry, DosconfError> {
        self.handle(selector)?.remove_entry(name)
    }

    pub fn rename_entry<'s>(
        &mut self,
        selector: impl Into<SectionSelector<'s>>,
        name: &str,
        new_name: impl Into<String>,
    ) -> Result<(), DosconfError> {
        self.handle(selector)?.rename_entry(name, new_name)
    }

    // --- validation ---

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check every section, the section index, every back-reference and the
    /// document comments.
    pub fn validate(&self) -> Result<(), DosconfError> {
        if !self.sections.is_consistent() {
            return Err(DosconfError::Inconsistent(
                "section index is out of step with the sections".into(),
            ));
        }
        for section in self.sections.iter() {
            section.validate()?;
            if section.document_id() != Some(self.id) {
                return Err(DosconfError::Inconsistent(format!(
                    "section '{}' does not point back at {}",
                    section.name(),
                    self.id
                )));
            }
        }
        if let Some(bad) = self.comments.iter().find(|c| !style::is_single_line(c)) {
            return Err(DosconfError::InvalidComment(bad.to_string()));
        }
        Ok(())
    }

    // --- reading and writing ---

    /// Parse a whole document. Nothing is returned unless every line was
    /// understood and the result validates.
    pub fn parse(bytes: &[u8]) -> Result<Document, DosconfError> {
        let newline = Newline::detect(bytes).unwrap_or_default();
        let text = std::str::from_utf8(bytes)?;

        let mut doc = Document::new().with_newline(newline);
        let mut dialect = Style::NONE;
        let mut lines = LineReader::new(text);

        while let Some((line_no, raw)) = lines.peek() {
            let line = raw.trim();
            if line.is_empty() {
                lines.next();
                continue;
            }
            if doc.sections.is_empty()
                && let Some(text) = parse::comment_text(raw.trim_start())
            {
                doc.comments.push(text);
                lines.next();
                continue;
            }

            let mut section = Section::read_from(&mut lines, &mut dialect)?;
            section.attach(doc.id);
            doc.sections.push(section).map_err(|rejected| DosconfError::Parse {
                line: line_no,
                kind: ParseErrorKind::DuplicateSection(rejected.name().to_string()),
            })?;
        }

        doc.style = dialect;
        doc.validate()?;
        debug!(
            sections = doc.sections.len(),
            comments = doc.comments.len(),
            ?newline,
            ?dialect,
            "parsed document"
        );
        Ok(doc)
    }

    /// Render the document. `style` and `newline` default to the document's
    /// own (as detected by [`parse`](Self::parse) or set explicitly).
    pub fn serialize(
        &self,
        style: Option<Style>,
        newline: Option<Newline>,
    ) -> Result<Vec<u8>, DosconfError> {
        Ok(self.to_text(style, newline)?.into_bytes())
    }

    /// Like [`serialize`](Self::serialize), as a `String`.
    pub fn to_text(
        &self,
        style: Option<Style>,
        newline: Option<Newline>,
    ) -> Result<String, DosconfError> {
        self.validate()?;
        let style = style.unwrap_or(self.style);
        let newline = newline.unwrap_or(self.newline);
        let nl = newline.as_str();

        let mut out = String::new();
        for comment in self.comments.iter() {
            out.push(COMMENT_CHAR);
            if !comment.is_empty() {
                out.push(' ');
                out.push_str(comment);
            }
            out.push_str(nl);
        }
        if !self.comments.is_empty() && !self.sections.is_empty() {
            out.push_str(nl);
        }
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                out.push_str(nl);
            }
            section.write_to(&mut out, style, newline)?;
        }
        Ok(out)
    }
}

impl FromStr for Document {
    type Err = DosconfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Document::parse(s.as_bytes())
    }
}

/// Clones get a fresh id, carry no observers, and own clones of every
/// section.
impl Clone for Document {
    fn clone(&self) -> Self {
        let id = DocumentId::fresh();
        let mut sections = self.sections.clone();
        for section in sections.iter_mut() {
            section.attach(id);
        }
        Self {
            id,
            comments: self.comments.clone(),
            sections,
            style: self.style,
            newline: self.newline,
            path: self.path.clone(),
            observers: Observers::default(),
        }
    }
}

/// Structural: comments and sections in order. Dialect, newline and path
/// are formatting concerns and do not take part.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.comments == other.comments && self.sections.iter().eq(other.sections.iter())
    }
}

impl Eq for Document {}
