//! Change notification.
//!
//! Every successful mutation made through a [`Document`](crate::Document)
//! (or one of its handles) is reported as one [`ChangeEvent`] to each
//! subscribed [`Observer`], synchronously and in order. Events carry enough
//! context (section name, index, old and new values) for an observer such as
//! a UI binding to mirror the change without re-reading the tree.
//!
//! Failed calls emit nothing. With no observers subscribed, no event is even
//! constructed.

use std::fmt;

use serde::Serialize;
use tracing::trace;

/// Which comment block a comment event refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommentScope {
    /// The leading comment block of the document.
    Document,
    /// The comment block of the named section.
    Section { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChangeEvent {
    CommentAdded {
        scope: CommentScope,
        index: usize,
        text: String,
    },
    CommentInserted {
        scope: CommentScope,
        index: usize,
        text: String,
    },
    CommentReplaced {
        scope: CommentScope,
        index: usize,
        old: String,
        new: String,
    },
    CommentRemoved {
        scope: CommentScope,
        index: usize,
        text: String,
    },
    CommentsCleared {
        scope: CommentScope,
    },
    SectionAdded {
        index: usize,
        name: String,
    },
    SectionInserted {
        index: usize,
        name: String,
    },
    SectionReplaced {
        index: usize,
        old_name: String,
        new_name: String,
    },
    SectionRemoved {
        index: usize,
        name: String,
    },
    SectionRenamed {
        index: usize,
        old_name: String,
        new_name: String,
    },
    EntryAdded {
        section: String,
        index: usize,
        name: String,
        value: String,
    },
    EntryInserted {
        section: String,
        index: usize,
        name: String,
        value: String,
    },
    EntryReplaced {
        section: String,
        index: usize,
        old_name: String,
        new_name: String,
    },
    EntryRemoved {
        section: String,
        index: usize,
        name: String,
    },
    EntryRenamed {
        section: String,
        index: usize,
        old_name: String,
        new_name: String,
    },
    EntryValueChanged {
        section: String,
        index: usize,
        name: String,
        old_value: String,
        new_value: String,
    },
    EntriesCleared {
        section: String,
    },
    /// Every section and document comment was removed.
    Cleared,
}

/// Receives change events. Implemented for any `FnMut(&ChangeEvent)`.
///
/// An observer must not mutate the document that notifies it.
pub trait Observer {
    fn on_change(&mut self, event: &ChangeEvent);
}

impl<F> Observer for F
where
    F: FnMut(&ChangeEvent),
{
    fn on_change(&mut self, event: &ChangeEvent) {
        self(event)
    }
}

/// Handle returned by [`Document::subscribe`](crate::Document::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

#[derive(Default)]
pub(crate) struct Observers {
    next: u64,
    list: Vec<(ObserverId, Box<dyn Observer>)>,
}

impl Observers {
    pub fn subscribe(&mut self, observer: Box<dyn Observer>) -> ObserverId {
        let id = ObserverId(self.next);
        self.next += 1;
        self.list.push((id, observer));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.list.len();
        self.list.retain(|(i, _)| *i != id);
        self.list.len() != before
    }

    /// Build the event only if someone is listening.
    pub fn emit_with(&mut self, make: impl FnOnce() -> ChangeEvent) {
        if self.list.is_empty() {
            return;
        }
        let event = make();
        trace!(?event, observers = self.list.len(), "dispatching change event");
        for (_, observer) in &mut self.list {
            observer.on_change(&event);
        }
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.list.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn emit_reaches_every_observer_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut observers = Observers::default();
        for tag in ["first", "second"] {
            let seen = Rc::clone(&seen);
            observers.subscribe(Box::new(move |e: &ChangeEvent| {
                seen.borrow_mut().push((tag, e.clone()));
            }));
        }

        observers.emit_with(|| ChangeEvent::Cleared);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, "first");
        assert_eq!(seen[1].0, "second");
    }

    #[test]
    fn no_observers_means_no_event_built() {
        let mut observers = Observers::default();
        observers.emit_with(|| panic!("event built with nobody listening"));
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut observers = Observers::default();
        let c = Rc::clone(&count);
        let id = observers.subscribe(Box::new(move |_: &ChangeEvent| *c.borrow_mut() += 1));

        observers.emit_with(|| ChangeEvent::Cleared);
        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        observers.emit_with(|| ChangeEvent::Cleared);

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn events_serialize_with_tag() {
        let event = ChangeEvent::EntryRenamed {
            section: "sdl".into(),
            index: 2,
            old_name: "output".into(),
            new_name: "renderer".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "entry_renamed");
        assert_eq!(json["section"], "sdl");
        assert_eq!(json["index"], 2);

        let scoped = ChangeEvent::CommentsCleared {
            scope: CommentScope::Section { name: "cpu".into() },
        };
        let json = serde_json::to_value(&scoped).unwrap();
        assert_eq!(json["scope"]["kind"], "section");
        assert_eq!(json["scope"]["name"], "cpu");
    }
}
