//! Identifier grammar and line/column helpers.
//!
//! Columns are counted in characters. Regex matches report byte offsets, so
//! everything that turns a match into a [`Span`] goes through [`char_column`].
//! LSP columns are UTF-16 code units and go through [`utf16_column`] and
//! [`char_column_of_utf16`].

use crate::types::{Position, Span};

pub const COMMENT_CHAR: char = '#';

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Checks `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if is_ident_start(c) => chars.all(is_ident_char),
        _ => false,
    }
}

/// Character column of a byte offset.
pub fn char_column(line: &str, byte: usize) -> usize {
    line.get(..byte)
        .map(|s| s.chars().count())
        .unwrap_or_else(|| line.chars().count())
}

/// Byte offset of a character column, clamped to the line length.
pub fn byte_offset(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

/// UTF-16 code units before character column `column`.
pub fn utf16_column(line: &str, column: usize) -> usize {
    line.chars().take(column).map(char::len_utf16).sum()
}

/// Character column at a UTF-16 offset. An offset that splits a surrogate
/// pair lands after that character.
pub fn char_column_of_utf16(line: &str, units: usize) -> usize {
    let mut seen = 0;
    for (column, c) in line.chars().enumerate() {
        if seen >= units {
            return column;
        }
        seen += c.len_utf16();
    }
    line.chars().count()
}

/// Text of `line` before the cursor column.
pub fn prefix_before(line: &str, column: usize) -> &str {
    &line[..byte_offset(line, column)]
}

/// Line `index` of `text`, or `None` past the end.
pub fn line_at(text: &str, index: usize) -> Option<&str> {
    text.lines().nth(index)
}

/// Everything before a `#` comment.
pub fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT_CHAR) {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// The identifier touching `column` on `line`, with its span.
///
/// A cursor directly after the last character still selects the word.
pub fn word_at(line: &str, line_index: usize, column: usize) -> Option<(Span, &str)> {
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let col = column.min(chars.len());

    let touches = |i: usize| chars.get(i).map_or(false, |(_, c)| is_ident_char(*c));
    let anchor = if touches(col) {
        col
    } else if col > 0 && touches(col - 1) {
        col - 1
    } else {
        return None;
    };

    let mut start = anchor;
    while start > 0 && touches(start - 1) {
        start -= 1;
    }
    let mut end = anchor + 1;
    while touches(end) {
        end += 1;
    }

    let byte_start = chars[start].0;
    let byte_end = chars.get(end).map_or(line.len(), |(i, _)| *i);
    let word = &line[byte_start..byte_end];
    if !is_identifier(word) {
        return None;
    }
    Some((Span::new(line_index, start, end), word))
}

/// Like [`word_at`], but a `.` directly before the word is included so that
/// directives resolve as `.equ` rather than `equ`. A cursor on the dot itself
/// selects the word that follows it.
pub fn dotted_word_at(line: &str, line_index: usize, column: usize) -> Option<(Span, String)> {
    let mut chars = line.chars().skip(column);
    let column = match (chars.next(), chars.next()) {
        (Some('.'), Some(next)) if is_ident_start(next) => column + 1,
        _ => column,
    };
    let (span, word) = word_at(line, line_index, column)?;
    if span.start > 0 && line.chars().nth(span.start - 1) == Some('.') {
        Some((Span::new(line_index, span.start - 1, span.end), format!(".{word}")))
    } else {
        Some((span, word.to_string()))
    }
}

/// Identifier under the cursor in a whole document.
pub fn identifier_at(text: &str, pos: Position) -> Option<(Span, String)> {
    let line = line_at(text, pos.line)?;
    word_at(line, pos.line, pos.column).map(|(span, w)| (span, w.to_string()))
}
