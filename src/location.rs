//! Source location utilities.

use std::fmt;

use serde::Serialize;

/// Row/column location within the source document (1-indexed).
///
/// Rows count every physical line of the input, blank lines included, so a
/// location always points at the line an editor would show.
/// The default value is [`Location::UNKNOWN`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    /// 1-indexed row number in the input.
    pub(crate) line: u32,
    /// 1-indexed column number (indentation + 1 for line-level locations).
    pub(crate) column: u32,
}

impl Location {
    /// Sentinel value meaning "location unknown".
    pub const UNKNOWN: Self = Self { line: 0, column: 0 };

    /// Create a new location record from a 1-indexed row and column.
    pub(crate) const fn new(line: usize, column: usize) -> Self {
        // Truncates past u32::MAX.
        Self {
            line: line as u32,
            column: column as u32,
        }
    }

    /// 1-indexed line of this location, `0` when unknown.
    pub fn line(&self) -> u64 {
        self.line as u64
    }

    /// 1-indexed column of this location, `0` when unknown.
    pub fn column(&self) -> u64 {
        self.column as u64
    }

    pub(crate) fn is_known(&self) -> bool {
        self != &Self::UNKNOWN
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}
