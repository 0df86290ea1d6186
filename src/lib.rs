//! Read, edit and write DOSBox-style configuration files without losing
//! their layout.
//!
//! A configuration file is a list of `[section]` blocks, each holding
//! `#` comment lines and `name=value` entries, optionally preceded by
//! document-level comments:
//!
//! ```text
//! # This is the configuration file for DOSBox.
//!
//! [sdl]
//! # fullscreen: Start directly in fullscreen.
//! fullscreen=false
//!
//! [cpu]
//! core=auto
//! ```
//!
//! [`Document::parse`] turns such a file into an editable tree and
//! [`Document::serialize`] turns it back into bytes in the same dialect
//! (padded or plain `=`, blank line after comments or not) and the same
//! newline convention, so reading and writing an untouched file reproduces
//! it.
//!
//! ```ignore
//! let mut doc = Document::load_from("dosbox.conf")?;
//! doc.set_value("cpu", "cycles", "max")?;
//! doc.save(true)?;
//! ```
//!
//! # Ownership
//!
//! A [`Document`] owns its [`Section`]s and each section owns its
//! [`Entry`]s. Section names are unique ignoring ASCII case; entry names are
//! unique within their section and case-sensitive. Every item knows the id
//! of its owner ([`Section::document_id`], [`Entry::section_id`]); values
//! built on their own or removed from a tree are detached.
//!
//! Items inside a document are changed through handles borrowed from it:
//! [`SectionMut`], [`EntryMut`] and [`CommentsMut`]. Handles route renames
//! and removals through the owner so name indexes never go stale, and every
//! failing call leaves the tree exactly as it was.
//!
//! # Change notification
//!
//! [`Document::subscribe`] registers an [`Observer`] (any
//! `FnMut(&ChangeEvent)` works) that receives one [`ChangeEvent`] per
//! elementary change. Nothing is built when nobody listens.
//!
//! # Merging
//!
//! [`Document::merge_with`] overlays another document: values of matching
//! entries are replaced in place, new entries and sections are appended and
//! comments are concatenated. Both sides are validated first.
//!
//! # Locating files
//!
//! [`Dosconf::builder()`] finds configuration files across [`SearchPath`]s,
//! merges or picks them per [`SearchMode`], and runs [`ConfAction`]s
//! (`list`, `get`, `set`, ...) against them. Names and the style of new
//! files come from [`Settings`].
//!
//! # Clap adapter
//!
//! The `cli` module (behind the `clap` feature, on by default) provides
//! [`ConfArgs`], a derive struct that maps command-line arguments to a
//! [`ConfAction`]. To use dosconf without clap:
//!
//! ```toml
//! dosconf = { version = "...", default-features = false }
//! ```
//!
//! # Logging
//!
//! Parsing, merging, loading, saving and discovery emit [`tracing`] events.
//! The library never installs a subscriber.

pub mod error;
pub mod style;
pub mod types;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod comments;
mod document;
mod entry;
mod events;
mod file;
mod ids;
mod merge;
mod named_map;
mod ops;
mod parse;
mod persist;
mod section;
mod settings;

#[cfg(test)]
mod fixtures;

pub use builder::{Dosconf, DosconfBuilder};
#[cfg(feature = "clap")]
pub use cli::{ConfArgs, ConfSubcommand};
pub use comments::{Comments, CommentsMut};
pub use document::{Document, SectionSelector};
pub use entry::{Entry, EntryMut};
pub use error::{DosconfError, ParseErrorKind};
pub use events::{ChangeEvent, CommentScope, Observer, ObserverId};
pub use ids::{DocumentId, SectionId};
pub use ops::ConfResult;
pub use section::{Section, SectionMut};
pub use settings::Settings;
pub use style::{Newline, Style};
pub use types::{ConfAction, SearchMode, SearchPath};
