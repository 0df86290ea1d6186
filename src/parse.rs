//! Line-level reading helpers shared by the document and section readers.

use std::iter::{Enumerate, Peekable};
use std::str::Lines;

use crate::style::{COMMENT_CHAR, SECTION_CLOSE, SECTION_OPEN};

/// Iterates over the lines of a document with 1-based line numbers. A reader
/// that meets a line it does not own can leave it in place with `peek` so the
/// caller resumes on that same line.
#[derive(Debug)]
pub(crate) struct LineReader<'a> {
    lines: Peekable<Enumerate<Lines<'a>>>,
}

impl<'a> LineReader<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate().peekable(),
        }
    }

    pub fn peek(&mut self) -> Option<(usize, &'a str)> {
        self.lines.peek().map(|&(i, line)| (i + 1, line))
    }
}

impl<'a> Iterator for LineReader<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.next().map(|(i, line)| (i + 1, line))
    }
}

/// The name inside `[name]`, when `line` (already trimmed) is a header.
pub(crate) fn header_name(line: &str) -> Option<&str> {
    line.strip_prefix(SECTION_OPEN)?.strip_suffix(SECTION_CLOSE)
}

/// The text of a comment line (leading whitespace already removed), with the
/// marker and at most one separating space or tab stripped. Trailing
/// whitespace is kept.
pub(crate) fn comment_text(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(COMMENT_CHAR)?;
    Some(
        rest.strip_prefix(' ')
            .or_else(|| rest.strip_prefix('\t'))
            .unwrap_or(rest),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_does_not_consume() {
        let mut lines = LineReader::new("[a]\nx=1\r\n");
        assert_eq!(lines.peek(), Some((1, "[a]")));
        assert_eq!(lines.next(), Some((1, "[a]")));
        assert_eq!(lines.peek(), Some((2, "x=1")));
        assert_eq!(lines.next(), Some((2, "x=1")));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn headers() {
        assert_eq!(header_name("[dosbox]"), Some("dosbox"));
        assert_eq!(header_name("[]"), Some(""));
        assert_eq!(header_name("[dosbox"), None);
        assert_eq!(header_name("x=[y]"), None);
    }

    #[test]
    fn comments_strip_one_separator() {
        assert_eq!(comment_text("# hello"), Some("hello"));
        assert_eq!(comment_text("#  two"), Some(" two"));
        assert_eq!(comment_text("#\ttab"), Some("tab"));
        assert_eq!(comment_text("#bare"), Some("bare"));
        assert_eq!(comment_text("#"), Some(""));
        assert_eq!(comment_text("# note  "), Some("note  "));
        assert_eq!(comment_text("x=#"), None);
    }
}
