//! Ordered comment lines, as held by a document and by each section.
//!
//! Comments are stored without their `#` marker. Index-taking mutators never
//! panic: an out-of-range index is a no-op reported through the return value.

use std::ops::Deref;

use crate::events::{ChangeEvent, CommentScope, Observers};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comments {
    lines: Vec<String>,
}

impl Comments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.lines.iter().any(|l| l == text)
    }

    pub fn first_index_of(&self, text: &str) -> Option<usize> {
        self.lines.iter().position(|l| l == text)
    }

    pub fn last_index_of(&self, text: &str) -> Option<usize> {
        self.lines.iter().rposition(|l| l == text)
    }

    /// The comment at `index`, or `""` when out of range.
    pub fn get(&self, index: usize) -> &str {
        self.lines.get(index).map_or("", String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn push(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    /// Returns the replaced text.
    pub fn replace(&mut self, index: usize, text: impl Into<String>) -> Option<String> {
        let slot = self.lines.get_mut(index)?;
        Some(std::mem::replace(slot, text.into()))
    }

    /// Replace the first line equal to `old`. Returns its index.
    pub fn replace_first(&mut self, old: &str, new: impl Into<String>) -> Option<usize> {
        let index = self.first_index_of(old)?;
        self.lines[index] = new.into();
        Some(index)
    }

    /// Replace the last line equal to `old`. Returns its index.
    pub fn replace_last(&mut self, old: &str, new: impl Into<String>) -> Option<usize> {
        let index = self.last_index_of(old)?;
        self.lines[index] = new.into();
        Some(index)
    }

    /// Insert before `index`; `index == len()` appends.
    pub fn insert(&mut self, index: usize, text: impl Into<String>) -> bool {
        if index > self.lines.len() {
            return false;
        }
        self.lines.insert(index, text.into());
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.lines.len()).then(|| self.lines.remove(index))
    }

    pub fn remove_first(&mut self, text: &str) -> Option<usize> {
        let index = self.first_index_of(text)?;
        self.lines.remove(index);
        Some(index)
    }

    pub fn remove_last(&mut self, text: &str) -> Option<usize> {
        let index = self.last_index_of(text)?;
        self.lines.remove(index);
        Some(index)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub(crate) fn extend_from(&mut self, other: &Comments) {
        self.lines.extend(other.lines.iter().cloned());
    }
}

impl<S: Into<String>> FromIterator<S> for Comments {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Mutable view of a comment block that belongs to a document, reporting
/// each change to the document's observers.
pub struct CommentsMut<'a> {
    comments: &'a mut Comments,
    observers: &'a mut Observers,
    scope: CommentScope,
}

impl<'a> CommentsMut<'a> {
    pub(crate) fn new(
        comments: &'a mut Comments,
        observers: &'a mut Observers,
        scope: CommentScope,
    ) -> Self {
        Self {
            comments,
            observers,
            scope,
        }
    }

    pub fn push(&mut self, text: impl Into<String>) {
        let text = text.into();
        let index = self.comments.len();
        self.comments.push(text.clone());
        let scope = &self.scope;
        self.observers.emit_with(|| ChangeEvent::CommentAdded {
            scope: scope.clone(),
            index,
            text,
        });
    }

    pub fn insert(&mut self, index: usize, text: impl Into<String>) -> bool {
        let text = text.into();
        if !self.comments.insert(index, text.clone()) {
            return false;
        }
        let scope = &self.scope;
        self.observers.emit_with(|| ChangeEvent::CommentInserted {
            scope: scope.clone(),
            index,
            text,
        });
        true
    }

    pub fn replace(&mut self, index: usize, text: impl Into<String>) -> Option<String> {
        let new = text.into();
        let old = self.comments.replace(index, new.clone())?;
        let scope = &self.scope;
        let reported = old.clone();
        self.observers.emit_with(|| ChangeEvent::CommentReplaced {
            scope: scope.clone(),
            index,
            old: reported,
            new,
        });
        Some(old)
    }

    pub fn replace_first(&mut self, old: &str, new: impl Into<String>) -> Option<usize> {
        let index = self.comments.first_index_of(old)?;
        self.replace(index, new).map(|_| index)
    }

    pub fn replace_last(&mut self, old: &str, new: impl Into<String>) -> Option<usize> {
        let index = self.comments.last_index_of(old)?;
        self.replace(index, new).map(|_| index)
    }

    pub fn remove(&mut self, index: usize) -> Option<String> {
        let text = self.comments.remove(index)?;
        let scope = &self.scope;
        let reported = text.clone();
        self.observers.emit_with(|| ChangeEvent::CommentRemoved {
            scope: scope.clone(),
            index,
            text: reported,
        });
        Some(text)
    }

    pub fn remove_first(&mut self, text: &str) -> Option<usize> {
        let index = self.comments.first_index_of(text)?;
        self.remove(index).map(|_| index)
    }

    pub fn remove_last(&mut self, text: &str) -> Option<usize> {
        let index = self.comments.last_index_of(text)?;
        self.remove(index).map(|_| index)
    }

    /// Emits nothing when the block is already empty.
    pub fn clear(&mut self) {
        if self.comments.is_empty() {
            return;
        }
        self.comments.clear();
        let scope = &self.scope;
        self.observers.emit_with(|| ChangeEvent::CommentsCleared {
            scope: scope.clone(),
        });
    }
}

impl Deref for CommentsMut<'_> {
    type Target = Comments;

    fn deref(&self) -> &Comments {
        self.comments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn sample() -> Comments {
        ["a", "b", "a", "c"].into_iter().collect()
    }

    #[test]
    fn lookups() {
        let c = sample();
        assert_eq!(c.len(), 4);
        assert!(c.contains("b"));
        assert!(!c.contains("z"));
        assert_eq!(c.first_index_of("a"), Some(0));
        assert_eq!(c.last_index_of("a"), Some(2));
        assert_eq!(c.first_index_of("z"), None);
    }

    #[test]
    fn get_out_of_range_is_empty() {
        let c = sample();
        assert_eq!(c.get(3), "c");
        assert_eq!(c.get(4), "");
        assert_eq!(Comments::new().get(0), "");
    }

    #[test]
    fn replace_variants() {
        let mut c = sample();
        assert_eq!(c.replace(1, "B"), Some("b".into()));
        assert_eq!(c.replace(10, "x"), None);
        assert_eq!(c.replace_last("a", "A"), Some(2));
        assert_eq!(c.replace_first("a", "A"), Some(0));
        assert_eq!(c.replace_first("nope", "x"), None);
        assert_eq!(c.iter().collect::<Vec<_>>(), ["A", "B", "A", "c"]);
    }

    #[test]
    fn insert_bounds() {
        let mut c = sample();
        assert!(c.insert(4, "end"));
        assert!(c.insert(0, "start"));
        assert!(!c.insert(7, "far"));
        assert_eq!(c.len(), 6);
        assert_eq!(c.get(0), "start");
        assert_eq!(c.get(5), "end");
    }

    #[test]
    fn remove_variants() {
        let mut c = sample();
        assert_eq!(c.remove_last("a"), Some(2));
        assert_eq!(c.remove_first("a"), Some(0));
        assert_eq!(c.remove(5), None);
        assert_eq!(c.remove(0), Some("b".into()));
        assert_eq!(c.iter().collect::<Vec<_>>(), ["c"]);
        c.clear();
        assert!(c.is_empty());
    }

    #[test]
    fn handle_reports_each_change() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut observers = Observers::default();
        let sink = Rc::clone(&events);
        observers.subscribe(Box::new(move |e: &ChangeEvent| sink.borrow_mut().push(e.clone())));

        let mut comments = Comments::new();
        {
            let mut handle =
                CommentsMut::new(&mut comments, &mut observers, CommentScope::Document);
            handle.push("one");
            handle.insert(0, "zero");
            assert!(!handle.insert(9, "nowhere"));
            handle.replace_first("one", "uno");
            assert_eq!(handle.remove_last("missing"), None);
            handle.remove(0);
            handle.clear();
            handle.clear();
        }

        let events = events.borrow();
        assert_eq!(
            *events,
            vec![
                ChangeEvent::CommentAdded {
                    scope: CommentScope::Document,
                    index: 0,
                    text: "one".into()
                },
                ChangeEvent::CommentInserted {
                    scope: CommentScope::Document,
                    index: 0,
                    text: "zero".into()
                },
                ChangeEvent::CommentReplaced {
                    scope: CommentScope::Document,
                    index: 1,
                    old: "one".into(),
                    new: "uno".into()
                },
                ChangeEvent::CommentRemoved {
                    scope: CommentScope::Document,
                    index: 0,
                    text: "zero".into()
                },
                ChangeEvent::CommentsCleared {
                    scope: CommentScope::Document
                },
            ]
        );
        assert!(comments.is_empty());
    }
}
