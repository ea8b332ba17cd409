//! Raw line stream with an index cursor.
//!
//! The reducer needs to give back exactly one line when a block turns out not
//! to belong to the current key, so the stream is a random-access array of
//! lines rather than a one-directional iterator.

use crate::error::Error;
use crate::location::Location;

/// One non-blank source line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Line<'a> {
    /// 1-indexed row in the original text, blank lines included.
    pub(crate) row: usize,
    /// Number of leading spaces.
    pub(crate) indent: usize,
    /// Content after the indentation, trailing whitespace removed.
    pub(crate) content: &'a str,
}

impl Line<'_> {
    pub(crate) fn location(&self) -> Location {
        Location::new(self.row, self.indent + 1)
    }
}

/// Non-blank lines of a document and a cursor into them.
#[derive(Debug)]
pub(crate) struct Lines<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
}

impl<'a> Lines<'a> {
    /// Split `text` into lines, dropping blank ones.
    ///
    /// Indentation is made of spaces only; a tab before the content is rejected.
    pub(crate) fn new(text: &'a str) -> Result<Self, Error> {
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
        let mut lines = Vec::new();
        for (i, raw) in text.lines().enumerate() {
            if raw.trim().is_empty() {
                continue;
            }
            let content = raw.trim_start_matches(' ');
            let indent = raw.len() - content.len();
            if content.starts_with('\t') {
                return Err(Error::malformed(
                    "tabs are not allowed in indentation",
                    Location::new(i + 1, indent + 1),
                ));
            }
            lines.push(Line {
                row: i + 1,
                indent,
                content: content.trim_end(),
            });
        }
        Ok(Self { lines, pos: 0 })
    }

    /// Advance the cursor and return the line under it.
    pub(crate) fn next(&mut self) -> Option<Line<'a>> {
        let line = self.lines.get(self.pos).copied()?;
        self.pos += 1;
        Some(line)
    }

    /// Give back the line last returned by [`Lines::next`].
    pub(crate) fn rewind(&mut self) {
        debug_assert!(self.pos > 0, "rewind before the first line");
        self.pos = self.pos.saturating_sub(1);
    }

    pub(crate) fn peek(&self) -> Option<Line<'a>> {
        self.lines.get(self.pos).copied()
    }

    pub(crate) fn first(&self) -> Option<Line<'a>> {
        self.lines.first().copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.lines.len()
    }

    pub(crate) fn into_inner(self) -> Vec<Line<'a>> {
        self.lines
    }
}
