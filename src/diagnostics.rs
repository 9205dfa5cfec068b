//! Duplicate-definition diagnostics
//!
//! Labels are checked in a single left-to-right pass. The first sighting of a
//! name is remembered; every later sighting produces two errors, one on the new
//! occurrence and one added back onto the first occurrence. A label defined
//! three times therefore yields four diagnostics, two per collision.

use std::collections::HashMap;

use tower_lsp::lsp_types::{
    Diagnostic, DiagnosticRelatedInformation, DiagnosticSeverity, Location, NumberOrString, Range,
    Url,
};

use crate::symbols::{match_equate, match_label, EquateKind};
use crate::types::Span;

pub const SOURCE: &str = "zx16";

/// Diagnostic code for a label defined more than once.
pub const DUPLICATE_LABEL: &str = "duplicate-label";

/// Diagnostic code for an `.equ` name defined more than once.
pub const DUPLICATE_EQU: &str = "duplicate-equ";

fn error(uri: &Url, range: Range, code: &str, message: String, other: Range, note: &str) -> Diagnostic {
    Diagnostic {
        range,
        severity: Some(DiagnosticSeverity::ERROR),
        code: Some(NumberOrString::String(code.to_string())),
        source: Some(SOURCE.to_string()),
        message,
        related_information: Some(vec![DiagnosticRelatedInformation {
            location: Location::new(uri.clone(), other),
            message: note.to_string(),
        }]),
        ..Default::default()
    }
}

/// Diagnostics for duplicate label definitions.
pub fn duplicate_labels(uri: &Url, text: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut first_seen: HashMap<&str, Span> = HashMap::new();

    for (index, line) in text.lines().enumerate() {
        let Some(label) = match_label(line, index) else {
            continue;
        };
        let Some(&first) = first_seen.get(label.name) else {
            first_seen.insert(label.name, label.span);
            continue;
        };

        diagnostics.push(error(
            uri,
            label.span.to_lsp_range(text),
            DUPLICATE_LABEL,
            format!(
                "Duplicate label '{}': first defined on line {}",
                label.name,
                first.line + 1
            ),
            first.to_lsp_range(text),
            "First definition",
        ));
        diagnostics.push(error(
            uri,
            first.to_lsp_range(text),
            DUPLICATE_LABEL,
            format!(
                "Duplicate label '{}': also defined on line {}",
                label.name,
                label.span.line + 1
            ),
            label.span.to_lsp_range(text),
            "Later definition",
        ));
    }
    diagnostics
}

/// Diagnostics for `.equ` names that are defined again with `.equ`.
/// `.set` is allowed to redefine a name and is ignored here.
pub fn duplicate_equates(uri: &Url, text: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut first_seen: HashMap<&str, Span> = HashMap::new();

    for (index, line) in text.lines().enumerate() {
        let Some(eq) = match_equate(line, index) else {
            continue;
        };
        if eq.kind != EquateKind::Equ {
            continue;
        }
        match first_seen.get(eq.name) {
            Some(&first) => diagnostics.push(error(
                uri,
                eq.span.to_lsp_range(text),
                DUPLICATE_EQU,
                format!(
                    "Constant '{}' is already defined with .equ on line {}",
                    eq.name,
                    first.line + 1
                ),
                first.to_lsp_range(text),
                "Previously defined here",
            )),
            None => {
                first_seen.insert(eq.name, eq.span);
            }
        }
    }
    diagnostics
}

/// Full validation pass. The result replaces any earlier set for the document.
pub fn validate(uri: &Url, text: &str) -> Vec<Diagnostic> {
    let mut diagnostics = duplicate_labels(uri, text);
    diagnostics.extend(duplicate_equates(uri, text));
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri() -> Url {
        Url::parse("file:///tmp/test.s").unwrap()
    }

    fn code_of(d: &Diagnostic) -> &str {
        match &d.code {
            Some(NumberOrString::String(s)) => s,
            _ => "",
        }
    }

    #[test]
    fn duplicate_label_pair() {
        let diagnostics = validate(&uri(), "main:\n  j main\nmain:\n  nop");
        assert_eq!(diagnostics.len(), 2);
        let lines: Vec<u32> = diagnostics.iter().map(|d| d.range.start.line).collect();
        assert_eq!(lines, vec![2, 0]);
        assert!(diagnostics[0].message.contains("line 1"));
        assert!(diagnostics[1].message.contains("line 3"));
        assert!(diagnostics
            .iter()
            .all(|d| d.severity == Some(DiagnosticSeverity::ERROR) && code_of(d) == DUPLICATE_LABEL));
    }

    #[test]
    fn unique_labels_are_clean() {
        let text = "start:\n  li a0, 1\nloop:\n  bnz a0, loop\nend:\n";
        assert!(validate(&uri(), text).is_empty());
    }

    #[test]
    fn triple_definition_counts_collisions() {
        let diagnostics = validate(&uri(), "x:\nx:\nx:\n");
        assert_eq!(diagnostics.len(), 4);
        let on_first = diagnostics.iter().filter(|d| d.range.start.line == 0).count();
        assert_eq!(on_first, 2);
    }

    #[test]
    fn diagnostic_covers_the_name() {
        let diagnostics = duplicate_labels(&uri(), "  loop:\n    loop: nop\n");
        let later = &diagnostics[0];
        assert_eq!(later.range.start.character, 4);
        assert_eq!(later.range.end.character, 8);
        let related = later.related_information.as_ref().unwrap();
        assert_eq!(related[0].location.range.start.line, 0);
    }

    #[test]
    fn validation_is_deterministic() {
        let text = "a:\nb:\na:\nb:\n.equ K, 1\n.equ K, 2\n";
        assert_eq!(validate(&uri(), text), validate(&uri(), text));
    }

    #[test]
    fn equ_redefinition_is_reported_but_set_is_not() {
        let text = ".equ K, 1\n.set K, 2\n.equ K, 3\n.set S, 1\n.set S, 2\n";
        let diagnostics = validate(&uri(), text);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(code_of(&diagnostics[0]), DUPLICATE_EQU);
        assert_eq!(diagnostics[0].range.start.line, 2);
        assert!(diagnostics[0].message.contains("line 1"));
    }
}
