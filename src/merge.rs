//! Overlaying one document (or section) on top of another.
//!
//! Merging is additive and later-wins:
//!
//! - comments of the overlay are appended after the existing ones;
//! - an entry present on both sides takes the overlay's value but keeps its
//!   position;
//! - entries and sections only present in the overlay are cloned and
//!   appended in the overlay's order.
//!
//! Both sides are validated before anything is touched, so a merge either
//! applies completely or fails with the target unchanged.

use tracing::debug;

use crate::document::Document;
use crate::error::DosconfError;
use crate::section::{Section, SectionMut};

impl Section {
    /// Merge `other` into this (detached) section.
    pub fn merge_with(&mut self, other: &Section) -> Result<(), DosconfError> {
        self.validate()?;
        other.validate()?;
        for entry in other.entries() {
            self.set_value(entry.name(), entry.value())?;
        }
        self.comments_mut().extend_from(other.comments());
        Ok(())
    }
}

impl SectionMut<'_> {
    /// Merge `other` into this section, reporting each change.
    pub fn merge_with(&mut self, other: &Section) -> Result<(), DosconfError> {
        self.validate()?;
        other.validate()?;
        for entry in other.entries() {
            self.set_value(entry.name(), entry.value())?;
        }
        let mut comments = self.comments_mut();
        for line in other.comments().iter() {
            comments.push(line);
        }
        Ok(())
    }
}

impl Document {
    /// Merge `other` into this document. Sections are matched by name,
    /// ignoring ASCII case.
    pub fn merge_with(&mut self, other: &Document) -> Result<(), DosconfError> {
        self.validate()?;
        other.validate()?;

        let mut comments = self.comments_mut();
        for line in other.comments().iter() {
            comments.push(line);
        }

        let mut added = 0;
        for section in other.sections() {
            match self.section_mut(section.name()) {
                Some(mut existing) => existing.merge_with(section)?,
                None => {
                    self.add_section(section.clone())?;
                    added += 1;
                }
            }
        }
        debug!(
            merged = other.len() - added,
            added,
            "merged document"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::document::Document;
    use crate::error::DosconfError;
    use crate::events::ChangeEvent;
    use crate::fixtures::test::record;
    use crate::section::Section;

    fn parse(text: &str) -> Document {
        text.parse().unwrap()
    }

    #[test]
    fn overlay_values_win_in_place() {
        let mut base = parse("[cpu]\ncore=auto\ncycles=auto\n");
        let overlay = parse("[CPU]\ncycles=max\ncputype=386\n");
        base.merge_with(&overlay).unwrap();

        let cpu = base.section("cpu").unwrap();
        assert_eq!(cpu.name(), "cpu");
        let entries: Vec<_> = cpu.entries().map(|e| e.to_string()).collect();
        assert_eq!(entries, ["core=auto", "cycles=max", "cputype=386"]);
        assert!(base.is_valid());
    }

    #[test]
    fn new_sections_are_cloned_and_appended() {
        let mut base = parse("[sdl]\nfullscreen=false\n");
        let overlay = parse("# from overlay\n[mixer]\nrate=44100\n[sdl]\noutput=opengl\n");
        base.merge_with(&overlay).unwrap();

        let names: Vec<_> = base.sections().map(Section::name).collect();
        assert_eq!(names, ["sdl", "mixer"]);
        assert_eq!(base.comments().get(0), "from overlay");

        let mixer = base.section("mixer").unwrap();
        assert_eq!(mixer.document_id(), Some(base.id()));
        assert_ne!(mixer.id(), overlay.section("mixer").unwrap().id());
        assert_eq!(base.value("sdl", "output"), Some("opengl"));

        // The overlay is untouched.
        assert_eq!(overlay.len(), 2);
        assert!(overlay.is_valid());
    }

    #[test]
    fn merged_result_matches_union() {
        let mut base = parse("# a\n[x]\n# x1\np=1\nq=2\n\n[y]\nr=3\n");
        let overlay = parse("# b\n[y]\n# y1\nr=30\ns=4\n\n[z]\nt=5\n");
        base.merge_with(&overlay).unwrap();

        let expected = "# a\n# b\n\n[x]\n# x1\np=1\nq=2\n\n[y]\n# y1\nr=30\ns=4\n\n[z]\nt=5\n";
        assert_eq!(base.to_text(None, None).unwrap(), expected);
    }

    #[test]
    fn merge_reports_changes() {
        let mut base = parse("[cpu]\ncore=auto\n");
        let overlay = parse("[cpu]\ncore=auto\ncycles=max\n[dos]\nems=true\n");
        let events = record(&mut base);
        base.merge_with(&overlay).unwrap();

        assert_eq!(
            *events.borrow(),
            vec![
                ChangeEvent::EntryAdded {
                    section: "cpu".into(),
                    index: 1,
                    name: "cycles".into(),
                    value: "max".into(),
                },
                ChangeEvent::SectionAdded {
                    index: 1,
                    name: "dos".into(),
                },
            ]
        );
    }

    #[test]
    fn invalid_overlay_leaves_target_unchanged() {
        let mut base = parse("[cpu]\ncore=auto\n");
        let before = base.clone();

        let mut overlay = parse("[cpu]\ncore=dynamic\n[dos]\nems=true\n");
        overlay.set_value("dos", "xms", "two\nlines").unwrap();

        assert!(matches!(
            base.merge_with(&overlay),
            Err(DosconfError::InvalidEntryValue { .. })
        ));
        assert_eq!(base, before);
    }

    #[test]
    fn detached_section_merge() {
        let mut a = Section::new("render");
        a.new_entry("aspect", "false").unwrap();
        let mut b = Section::new("RENDER");
        b.new_entry("aspect", "true").unwrap();
        b.new_entry("scaler", "normal2x").unwrap();
        b.comments_mut().push("scaling");

        a.merge_with(&b).unwrap();
        assert_eq!(a.value("aspect"), Some("true"));
        assert_eq!(a.value("scaler"), Some("normal2x"));
        assert_eq!(a.entry("scaler").unwrap().section_id(), Some(a.id()));
        assert_eq!(a.comments().get(0), "scaling");
        assert!(b.entry("scaler").unwrap().section_id() == Some(b.id()));
    }

    #[test]
    fn detached_merge_rejects_invalid_other() {
        let mut a = Section::new("render");
        a.new_entry("aspect", "false").unwrap();
        let mut b = Section::new("render");
        b.comments_mut().push("bad\ncomment");
        assert!(a.merge_with(&b).is_err());
        assert!(a.comments().is_empty());
    }
}
