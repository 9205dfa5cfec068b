//! Position and span types shared by the analysis passes
//!
//! Analysis works on 0-based line indices and character columns within a single
//! line. LSP clients count columns in UTF-16 code units, so converting at the
//! server edge needs the document text.

use tower_lsp::lsp_types::{Position as LspPosition, Range as LspRange};

use crate::text::{char_column_of_utf16, line_at, utf16_column};

/// A cursor position (line, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }

    /// Position in `text` for an LSP position.
    pub fn from_lsp(text: &str, pos: LspPosition) -> Self {
        let line = pos.line as usize;
        let units = pos.character as usize;
        let column = line_at(text, line).map_or(units, |l| char_column_of_utf16(l, units));
        Position::new(line, column)
    }

    pub fn to_lsp(self, text: &str) -> LspPosition {
        let character = line_at(text, self.line).map_or(self.column, |l| utf16_column(l, self.column));
        LspPosition::new(self.line as u32, character as u32)
    }
}

/// A single-line range: `start..end` columns on `line`.
///
/// Ordering is by line, then start column, which is the order every
/// reference list is returned in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(line: usize, start: usize, end: usize) -> Self {
        Span { line, start, end }
    }

    /// Span of `len` characters starting at `start`.
    pub fn at(line: usize, start: usize, len: usize) -> Self {
        Span::new(line, start, start + len)
    }

    pub fn key(&self) -> (usize, usize) {
        (self.line, self.start)
    }

    /// The LSP range of this span in `text`.
    pub fn to_lsp_range(self, text: &str) -> LspRange {
        let (start, end) = match line_at(text, self.line) {
            Some(line) => (utf16_column(line, self.start), utf16_column(line, self.end)),
            None => (self.start, self.end),
        };
        LspRange::new(
            LspPosition::new(self.line as u32, start as u32),
            LspPosition::new(self.line as u32, end as u32),
        )
    }
}
