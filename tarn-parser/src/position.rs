// tarn-parser - Source positions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Source cursors attached to reader-produced values and errors.
//!
//! A cursor is `(module?, row, col)`. Row 0 means "unknown line" and is
//! suppressed when formatting, so a cursor-less error renders as its bare
//! message. A `Position` can also act as a *starting* cursor handed to the
//! reader, letting embedded code (REPL lines, heredocs, library-loaded
//! strings) report positions relative to its host.

use std::fmt;
use std::rc::Rc;

/// A source cursor: optional module name plus 1-indexed row and column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Module (file or load unit) the source came from.
    pub module: Option<Rc<str>>,
    /// Row, 1-indexed. 0 means the line is unknown.
    pub row: u32,
    /// Column, 1-indexed. 0 means the column is unknown.
    pub col: u32,
}

impl Position {
    /// Create a cursor with no module.
    #[must_use]
    pub fn new(row: u32, col: u32) -> Self {
        Position {
            module: None,
            row,
            col,
        }
    }

    /// Create a starting cursor for a named module, pointing at its first
    /// character.
    #[must_use]
    pub fn in_module(name: &str) -> Self {
        Position {
            module: Some(Rc::from(name)),
            row: 1,
            col: 1,
        }
    }

    /// True when the cursor carries no usable line information.
    #[inline]
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.row == 0
    }
}

impl fmt::Display for Position {
    /// Formats as `module(Lrow,col)`, degrading when fields are missing:
    /// no column renders `module(Lrow)`, no module renders `(Lrow,col)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(module) = &self.module {
            f.write_str(module)?;
        }
        if self.col == 0 {
            write!(f, "(L{})", self.row)
        } else {
            write!(f, "(L{},{})", self.row, self.col)
        }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    /// Cursors order lexicographically by `(row, col)`; the module name does
    /// not participate. Sub-form cursors are always >= their container's.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.row, self.col).cmp(&(other.row, other.col))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_full() {
        let pos = Position {
            module: Some(Rc::from("core.tarn")),
            row: 12,
            col: 3,
        };
        assert_eq!(pos.to_string(), "core.tarn(L12,3)");
    }

    #[test]
    fn test_display_without_column() {
        let pos = Position {
            module: Some(Rc::from("core.tarn")),
            row: 12,
            col: 0,
        };
        assert_eq!(pos.to_string(), "core.tarn(L12)");
    }

    #[test]
    fn test_display_without_module() {
        assert_eq!(Position::new(4, 7).to_string(), "(L4,7)");
    }

    #[test]
    fn test_ordering_ignores_module() {
        let a = Position {
            module: Some(Rc::from("a")),
            row: 1,
            col: 5,
        };
        let b = Position {
            module: Some(Rc::from("z")),
            row: 1,
            col: 6,
        };
        assert!(a < b);
        assert!(Position::new(2, 1) > Position::new(1, 80));
    }
}
