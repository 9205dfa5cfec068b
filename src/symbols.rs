//! Symbol extraction
//!
//! Scans a document line by line for label definitions (`name:` at the start of
//! the line content) and `.equ`/`.set` constants. Nothing is evaluated: the
//! value of an equate is kept as the raw text after the comma.
//!
//! Matching is purely lexical. A line that does not fit one of the two
//! patterns exactly (for instance `.equ NAME` without a value) is skipped
//! rather than reported.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::text::char_column;
use crate::types::Span;

fn label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*):").expect("label pattern"))
}

fn equate_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*\.((?i:equ|set))\s+([A-Za-z_][A-Za-z0-9_]*)\s*,\s*(\S.*)$")
            .expect("equate pattern")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquateKind {
    Equ,
    Set,
}

impl EquateKind {
    pub fn directive(self) -> &'static str {
        match self {
            EquateKind::Equ => ".equ",
            EquateKind::Set => ".set",
        }
    }
}

impl fmt::Display for EquateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directive())
    }
}

/// A label definition found on a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMatch<'a> {
    pub name: &'a str,
    pub span: Span,
}

/// An `.equ`/`.set` definition found on a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquateMatch<'a> {
    pub name: &'a str,
    pub span: Span,
    pub kind: EquateKind,
    pub value: &'a str,
}

/// Match the label pattern against one line.
pub fn match_label(line: &str, line_index: usize) -> Option<LabelMatch<'_>> {
    let caps = label_regex().captures(line)?;
    let name = caps.get(1)?;
    let start = char_column(line, name.start());
    Some(LabelMatch {
        name: name.as_str(),
        span: Span::at(line_index, start, name.as_str().chars().count()),
    })
}

/// Match the equate pattern against one line.
pub fn match_equate(line: &str, line_index: usize) -> Option<EquateMatch<'_>> {
    let caps = equate_regex().captures(line)?;
    let keyword = caps.get(1)?.as_str();
    let name = caps.get(2)?;
    let value = caps.get(3)?.as_str().trim_end();
    let kind = if keyword.eq_ignore_ascii_case("equ") {
        EquateKind::Equ
    } else {
        EquateKind::Set
    };
    let start = char_column(line, name.start());
    Some(EquateMatch {
        name: name.as_str(),
        span: Span::at(line_index, start, name.as_str().chars().count()),
        kind,
        value,
    })
}

/// Span of the definition of `name` on this line, if the line defines it.
pub fn declaration_on_line(line: &str, line_index: usize, name: &str) -> Option<Span> {
    if let Some(label) = match_label(line, line_index) {
        if label.name == name {
            return Some(label.span);
        }
    }
    match_equate(line, line_index)
        .filter(|eq| eq.name == name)
        .map(|eq| eq.span)
}

/// A user-defined symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Label {
        name: String,
        span: Span,
    },
    Equate {
        name: String,
        span: Span,
        kind: EquateKind,
        value: String,
    },
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Label { name, .. } | Symbol::Equate { name, .. } => name,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Symbol::Label { span, .. } | Symbol::Equate { span, .. } => *span,
        }
    }

    pub fn is_label(&self) -> bool {
        matches!(self, Symbol::Label { .. })
    }
}

/// Every definition occurrence in a document, in line order.
///
/// Names map to *all* of their occurrences; duplicates are kept so the
/// diagnostics pass can report each collision.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    by_name: HashMap<String, Vec<usize>>,
}

impl SymbolTable {
    pub fn extract(text: &str) -> Self {
        let mut table = SymbolTable::default();
        for (index, line) in text.lines().enumerate() {
            if let Some(label) = match_label(line, index) {
                table.push(Symbol::Label {
                    name: label.name.to_string(),
                    span: label.span,
                });
            } else if let Some(eq) = match_equate(line, index) {
                table.push(Symbol::Equate {
                    name: eq.name.to_string(),
                    span: eq.span,
                    kind: eq.kind,
                    value: eq.value.to_string(),
                });
            }
        }
        table
    }

    fn push(&mut self, symbol: Symbol) {
        self.by_name
            .entry(symbol.name().to_string())
            .or_default()
            .push(self.symbols.len());
        self.symbols.push(symbol);
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// All definitions of `name`, in line order.
    pub fn definitions<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Symbol> + 'a {
        self.by_name
            .get(name)
            .into_iter()
            .flatten()
            .map(move |&i| &self.symbols[i])
    }

    pub fn first_definition(&self, name: &str) -> Option<&Symbol> {
        self.definitions(name).next()
    }

    pub fn labels(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(|s| s.is_label())
    }

    pub fn equates(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(|s| !s.is_label())
    }

    /// Label names, first occurrence order, without repeats.
    pub fn label_names(&self) -> Vec<&str> {
        unique_names(self.labels())
    }

    /// Equate/set names, first occurrence order, without repeats.
    pub fn equate_names(&self) -> Vec<&str> {
        unique_names(self.equates())
    }
}

fn unique_names<'a>(symbols: impl Iterator<Item = &'a Symbol>) -> Vec<&'a str> {
    let mut seen = std::collections::HashSet::new();
    symbols
        .map(Symbol::name)
        .filter(|name| seen.insert(*name))
        .collect()
}
