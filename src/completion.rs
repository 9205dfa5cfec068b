//! Context-sensitive completion candidates
//!
//! The text before the cursor decides between two mutually exclusive
//! contexts. Right after a `.` (or inside a partially typed directive) only
//! directives are offered; everywhere else instructions, registers, labels,
//! user constants and the predefined constants are offered.

use std::sync::OnceLock;

use regex::Regex;

use crate::catalog::{sorted_directives, sorted_instructions, DEFAULT_CONSTANTS, REGISTERS};
use crate::symbols::{Symbol, SymbolTable};
use crate::text::{line_at, prefix_before};
use crate::types::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuggestionKind {
    Directive,
    Instruction,
    Register,
    Label,
    Symbol,
    Constant,
}

impl SuggestionKind {
    /// Relative display priority, lower first.
    pub fn rank(self) -> u8 {
        match self {
            SuggestionKind::Directive => 0,
            SuggestionKind::Instruction => 1,
            SuggestionKind::Register => 2,
            SuggestionKind::Label => 3,
            SuggestionKind::Symbol | SuggestionKind::Constant => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub label: String,
    pub kind: SuggestionKind,
    pub detail: String,
    /// Snippet text (`${1:name}` placeholders) inserted on accept.
    pub insert_template: String,
    pub documentation: Option<String>,
}

impl Suggestion {
    pub fn sort_rank(&self) -> u8 {
        self.kind.rank()
    }

    /// Sort key: rank, then label.
    pub fn sort_text(&self) -> String {
        format!("{}{}", self.sort_rank(), self.label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionContext {
    AfterDirectiveDot,
    Normal,
}

fn partial_directive_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.\w*$").expect("partial directive pattern"))
}

impl CompletionContext {
    pub fn classify(prefix: &str, trigger: Option<&str>) -> Self {
        if trigger == Some(".")
            || prefix.ends_with('.')
            || partial_directive_regex().is_match(prefix)
        {
            CompletionContext::AfterDirectiveDot
        } else {
            CompletionContext::Normal
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionOptions {
    pub include_default_constants: bool,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        CompletionOptions {
            include_default_constants: true,
        }
    }
}

fn directive_suggestions() -> Vec<Suggestion> {
    sorted_directives()
        .into_iter()
        .map(|d| Suggestion {
            label: d.name.trim_start_matches('.').to_string(),
            kind: SuggestionKind::Directive,
            detail: d.template.to_string(),
            insert_template: d.template_after_dot().to_string(),
            documentation: Some(d.description.to_string()),
        })
        .collect()
}

fn normal_suggestions(table: &SymbolTable, options: &CompletionOptions) -> Vec<Suggestion> {
    let mut items = Vec::new();

    for ins in sorted_instructions() {
        items.push(Suggestion {
            label: ins.mnemonic.to_string(),
            kind: SuggestionKind::Instruction,
            detail: format!("{} ({})", ins.syntax(), ins.category),
            insert_template: ins.snippet(),
            documentation: Some(ins.semantics.to_string()),
        });
    }

    for reg in &REGISTERS {
        for (name, other) in [(reg.name, reg.alias), (reg.alias, reg.name)] {
            items.push(Suggestion {
                label: name.to_string(),
                kind: SuggestionKind::Register,
                detail: format!("{name} ({other}): {}", reg.purpose),
                insert_template: name.to_string(),
                documentation: None,
            });
        }
    }

    for name in table.label_names() {
        items.push(Suggestion {
            label: name.to_string(),
            kind: SuggestionKind::Label,
            detail: "label".to_string(),
            insert_template: name.to_string(),
            documentation: None,
        });
    }

    for name in table.equate_names() {
        let detail = match table.first_definition(name) {
            Some(Symbol::Equate { kind, value, .. }) => format!("{kind} {name}, {value}"),
            _ => "constant".to_string(),
        };
        items.push(Suggestion {
            label: name.to_string(),
            kind: SuggestionKind::Symbol,
            detail,
            insert_template: name.to_string(),
            documentation: None,
        });
    }

    if options.include_default_constants {
        for constant in &DEFAULT_CONSTANTS {
            items.push(Suggestion {
                label: constant.name.to_string(),
                kind: SuggestionKind::Constant,
                detail: format!("{} = {}", constant.name, constant.value),
                insert_template: constant.name.to_string(),
                documentation: Some(constant.description.to_string()),
            });
        }
    }

    items
}

/// Candidates for the cursor at `pos` in `text`.
pub fn completions(
    text: &str,
    pos: Position,
    trigger: Option<&str>,
    options: &CompletionOptions,
) -> Vec<Suggestion> {
    let prefix = line_at(text, pos.line)
        .map(|line| prefix_before(line, pos.column))
        .unwrap_or("");

    let mut items = match CompletionContext::classify(prefix, trigger) {
        CompletionContext::AfterDirectiveDot => directive_suggestions(),
        CompletionContext::Normal => normal_suggestions(&SymbolTable::extract(text), options),
    };
    items.sort_by(|a, b| a.sort_rank().cmp(&b.sort_rank()));
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(items: &[Suggestion]) -> Vec<SuggestionKind> {
        let mut kinds: Vec<_> = items.iter().map(|s| s.kind).collect();
        kinds.dedup();
        kinds
    }

    #[test]
    fn context_detection() {
        assert_eq!(CompletionContext::classify("    .", None), CompletionContext::AfterDirectiveDot);
        assert_eq!(CompletionContext::classify(".eq", None), CompletionContext::AfterDirectiveDot);
        assert_eq!(CompletionContext::classify("    ad", None), CompletionContext::Normal);
        assert_eq!(CompletionContext::classify("", Some(".")), CompletionContext::AfterDirectiveDot);
        assert_eq!(CompletionContext::classify("add a0, ", Some(" ")), CompletionContext::Normal);
    }

    #[test]
    fn after_dot_only_directives_without_dot() {
        let items = completions(".", Position::new(0, 1), Some("."), &CompletionOptions::default());
        assert_eq!(items.len(), 13);
        assert!(items.iter().all(|s| s.kind == SuggestionKind::Directive));
        assert!(items.iter().all(|s| !s.insert_template.starts_with('.')));
        assert!(items.iter().all(|s| s.sort_rank() == 0));
        let equ = items.iter().find(|s| s.label == "equ").unwrap();
        assert_eq!(equ.insert_template, "equ ${1:NAME}, ${2:value}");
    }

    #[test]
    fn normal_context_is_ranked() {
        let text = "start:\n.equ LIMIT, 10\n    \nstart:\n";
        let items = completions(text, Position::new(2, 4), None, &CompletionOptions::default());
        assert_eq!(
            kinds(&items),
            vec![
                SuggestionKind::Instruction,
                SuggestionKind::Register,
                SuggestionKind::Label,
                SuggestionKind::Symbol,
                SuggestionKind::Constant,
            ]
        );
        assert!(!items.iter().any(|s| s.kind == SuggestionKind::Directive));
        assert_eq!(items.iter().filter(|s| s.label == "start").count(), 1);
        assert_eq!(items.iter().filter(|s| s.kind == SuggestionKind::Register).count(), 16);
        let limit = items.iter().find(|s| s.label == "LIMIT").unwrap();
        assert_eq!(limit.detail, ".equ LIMIT, 10");
        let beq = items.iter().find(|s| s.label == "beq").unwrap();
        assert_eq!(beq.insert_template, "beq ${1:rs1}, ${2:rs2}, ${3:label}");
    }

    #[test]
    fn default_constants_can_be_hidden() {
        let options = CompletionOptions {
            include_default_constants: false,
        };
        let items = completions("", Position::new(0, 0), None, &options);
        assert!(!items.iter().any(|s| s.kind == SuggestionKind::Constant));
    }

    #[test]
    fn cursor_past_end_of_document() {
        let items = completions("nop", Position::new(5, 0), None, &CompletionOptions::default());
        assert!(!items.is_empty());
    }
}
