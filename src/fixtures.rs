#[cfg(test)]
pub mod test {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::document::Document;
    use crate::events::ChangeEvent;
    use crate::parse::LineReader;
    use crate::section::Section;
    use crate::style::Style;

    /// Plain dialect: no padding, comments directly followed by entries.
    pub const DOSBOX_CONF: &str = "\
# This is the configuration file for DOSBox 0.74.
# Lines starting with a # are comments.

[dosbox]
# machine: The type of machine tries to emulate.
machine=svga_s3
memsize=16

[cpu]
# core: CPU core used in emulation.
core=auto
cycles=auto

[autoexec]
# Lines in this section will be run at startup.

";

    /// Padded dialect with a blank line after section comments.
    pub const PADDED_CONF: &str = "\
# Generated by dosconf.

[mixer]
# Mixer settings.

rate      = 44100
blocksize = 1024

[sdl]
fullscreen = false
";

    #[test]
    fn samples_parse() {
        let plain: Document = DOSBOX_CONF.parse().unwrap();
        assert_eq!(plain.len(), 3);
        assert_eq!(plain.style(), Style::NONE);

        let padded: Document = PADDED_CONF.parse().unwrap();
        assert_eq!(padded.len(), 2);
        assert_eq!(
            padded.style(),
            Style::PAD_NAMES | Style::BLANK_AFTER_COMMENTS
        );
    }

    /// Read the first section of `text` on its own.
    pub fn read_one(text: &str) -> (Section, Style) {
        let mut lines = LineReader::new(text);
        let mut dialect = Style::NONE;
        let section = Section::read_from(&mut lines, &mut dialect).unwrap();
        (section, dialect)
    }

    /// Subscribe an observer that collects every event.
    pub fn record(doc: &mut Document) -> Rc<RefCell<Vec<ChangeEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        doc.subscribe(move |event: &ChangeEvent| sink.borrow_mut().push(event.clone()));
        events
    }
}
