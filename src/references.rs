//! Definition lookup and reference enumeration
//!
//! References are found by a fixed, ordered list of rules. Each rule scans a
//! line and reports the columns where it sees the identifier; the first rule
//! to claim a `(line, column)` wins and later rules cannot add it again.
//!
//! 1. the declaration itself (`name:` or `.equ/.set name, ...`)
//! 2. the last operand of a branch or jump
//! 3. anywhere inside the second operand of `la`
//! 4. the last operand of an immediate instruction
//! 5. any bare word on a line that does not declare the identifier
//!
//! Default constants have no declaration, so rule 1 is skipped for them.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::catalog::{is_default_constant, CONTROL_TRANSFER, IMMEDIATE_OPERAND, LOAD_ADDRESS};
use crate::symbols::{declaration_on_line, match_equate, match_label};
use crate::text::{char_column, identifier_at, strip_comment};
use crate::types::{Position, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Declaration,
    ControlTransfer,
    LoadAddress,
    Immediate,
    BareWord,
}

impl Rule {
    /// Matching order. Earlier rules claim positions first.
    pub const ORDER: [Rule; 5] = [
        Rule::Declaration,
        Rule::ControlTransfer,
        Rule::LoadAddress,
        Rule::Immediate,
        Rule::BareWord,
    ];

    fn scan(self, line: &ScannedLine<'_>, ident: &str, options: &ReferenceOptions, hits: &mut Vec<Span>) {
        match self {
            Rule::Declaration => hits.extend(line.declaration),
            Rule::ControlTransfer => {
                if let Some(ins) = line.instruction_in(&CONTROL_TRANSFER) {
                    hits.extend(ins.last_operand_if(ident).map(|op| line.span(op.start, ident)));
                }
            }
            Rule::LoadAddress => {
                let Some(ins) = &line.instruction else {
                    return;
                };
                if ins.mnemonic != LOAD_ADDRESS {
                    return;
                }
                if let Some(target) = ins.operands.get(1) {
                    for at in word_occurrences(target.text, ident) {
                        hits.push(line.span(target.start + at, ident));
                    }
                }
            }
            Rule::Immediate => {
                if let Some(ins) = line.instruction_in(&IMMEDIATE_OPERAND) {
                    hits.extend(ins.last_operand_if(ident).map(|op| line.span(op.start, ident)));
                }
            }
            Rule::BareWord => {
                if line.declaration.is_some() {
                    return;
                }
                let haystack = if options.search_comments {
                    line.text
                } else {
                    strip_comment(line.text)
                };
                for at in word_occurrences(haystack, ident) {
                    hits.push(line.span(at, ident));
                }
            }
        }
    }
}

/// Knobs for [`find_references_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceOptions {
    pub include_declaration: bool,
    /// Let the bare-word rule match text after a `#`.
    pub search_comments: bool,
}

impl Default for ReferenceOptions {
    fn default() -> Self {
        ReferenceOptions {
            include_declaration: true,
            search_comments: true,
        }
    }
}

/// One reference together with the rule that found it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub span: Span,
    pub rule: Rule,
}

fn instruction_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?:[A-Za-z_][A-Za-z0-9_]*:\s*)?([A-Za-z][A-Za-z0-9]*)\b(.*)$")
            .expect("instruction pattern")
    })
}

struct Operand<'a> {
    text: &'a str,
    /// Byte offset in the line.
    start: usize,
}

struct InstructionLine<'a> {
    mnemonic: String,
    operands: Vec<Operand<'a>>,
}

impl<'a> InstructionLine<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        let caps = instruction_regex().captures(strip_comment(line))?;
        let mnemonic = caps.get(1)?.as_str().to_ascii_lowercase();
        let rest = caps.get(2)?;

        let mut operands = Vec::new();
        let mut offset = rest.start();
        for piece in rest.as_str().split(',') {
            let trimmed = piece.trim_start();
            let text = trimmed.trim_end();
            if !text.is_empty() {
                operands.push(Operand {
                    text,
                    start: offset + (piece.len() - trimmed.len()),
                });
            }
            offset += piece.len() + 1;
        }
        Some(InstructionLine { mnemonic, operands })
    }

    fn last_operand_if(&self, ident: &str) -> Option<&Operand<'a>> {
        self.operands.last().filter(|op| op.text == ident)
    }
}

struct ScannedLine<'a> {
    index: usize,
    text: &'a str,
    instruction: Option<InstructionLine<'a>>,
    declaration: Option<Span>,
}

impl<'a> ScannedLine<'a> {
    fn new(text: &'a str, index: usize, ident: &str) -> Self {
        ScannedLine {
            index,
            text,
            instruction: InstructionLine::parse(text),
            declaration: declaration_on_line(text, index, ident),
        }
    }

    fn instruction_in(&self, mnemonics: &phf::Set<&'static str>) -> Option<&InstructionLine<'a>> {
        self.instruction
            .as_ref()
            .filter(|ins| mnemonics.contains(ins.mnemonic.as_str()))
    }

    fn span(&self, byte: usize, ident: &str) -> Span {
        Span::at(self.index, char_column(self.text, byte), ident.chars().count())
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Byte offsets of `ident` in `haystack` where it stands as a whole word.
fn word_occurrences(haystack: &str, ident: &str) -> Vec<usize> {
    if ident.is_empty() {
        return Vec::new();
    }
    haystack
        .match_indices(ident)
        .map(|(at, _)| at)
        .filter(|&at| {
            let before = haystack[..at].chars().next_back();
            let after = haystack[at + ident.len()..].chars().next();
            !before.map_or(false, is_word_char) && !after.map_or(false, is_word_char)
        })
        .collect()
}

/// Where `ident` is defined: the first label or equate declaring it.
///
/// Default constants never have a definition site.
pub fn find_definition(text: &str, ident: &str) -> Option<Span> {
    if is_default_constant(ident) {
        return None;
    }
    text.lines().enumerate().find_map(|(index, line)| {
        match_label(line, index)
            .filter(|label| label.name == ident)
            .map(|label| label.span)
            .or_else(|| {
                match_equate(line, index)
                    .filter(|eq| eq.name == ident)
                    .map(|eq| eq.span)
            })
    })
}

/// Every occurrence of `ident`, tagged with the rule that claimed it, sorted by
/// line and column.
pub fn classify_references(text: &str, ident: &str, options: &ReferenceOptions) -> Vec<Occurrence> {
    let skip_declaration = is_default_constant(ident);
    let mut claimed = HashSet::new();
    let mut found = Vec::new();
    let mut hits = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let scanned = ScannedLine::new(line, index, ident);
        for rule in Rule::ORDER {
            if rule == Rule::Declaration && skip_declaration {
                continue;
            }
            hits.clear();
            rule.scan(&scanned, ident, options, &mut hits);
            for &span in &hits {
                if claimed.insert(span.key()) {
                    found.push(Occurrence { span, rule });
                }
            }
        }
    }

    if !options.include_declaration {
        found.retain(|o| o.rule != Rule::Declaration);
    }
    found.sort_by_key(|o| o.span);
    found
}

pub fn find_references_with(text: &str, ident: &str, options: &ReferenceOptions) -> Vec<Span> {
    classify_references(text, ident, options)
        .into_iter()
        .map(|o| o.span)
        .collect()
}

pub fn find_references(text: &str, ident: &str, include_declaration: bool) -> Vec<Span> {
    let options = ReferenceOptions {
        include_declaration,
        ..Default::default()
    };
    find_references_with(text, ident, &options)
}

/// Definition of the identifier under the cursor.
pub fn definition_at(text: &str, pos: Position) -> Option<Span> {
    let (_, ident) = identifier_at(text, pos)?;
    find_definition(text, &ident)
}

/// References of the identifier under the cursor.
pub fn references_at(text: &str, pos: Position, options: &ReferenceOptions) -> Vec<Span> {
    match identifier_at(text, pos) {
        Some((_, ident)) => find_references_with(text, &ident, options),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRAM: &str = "\
.equ SIZE, 16
main:
    li a0, SIZE
    la a1, buffer
loop:
    addi a0, -1
    bnz a0, loop   # back to loop
    call done
    j main
done:
    ret
buffer:
    .fill SIZE, 1, 0
";

    fn rules(occurrences: &[Occurrence]) -> Vec<Rule> {
        occurrences.iter().map(|o| o.rule).collect()
    }

    #[test]
    fn equ_definition_and_references() {
        let text = ".equ SIZE, 16\n  addi a0, SIZE";
        assert_eq!(definition_at(text, Position::new(1, 12)), Some(Span::new(0, 5, 9)));
        let refs = find_references(text, "SIZE", true);
        assert_eq!(refs, vec![Span::new(0, 5, 9), Span::new(1, 11, 15)]);
        let refs = find_references(text, "SIZE", false);
        assert_eq!(refs, vec![Span::new(1, 11, 15)]);
    }

    #[test]
    fn definition_prefers_first_occurrence() {
        assert_eq!(find_definition("x:\n.equ x, 1\nx:\n", "x"), Some(Span::new(0, 0, 1)));
        assert_eq!(find_definition("nop\n", "missing"), None);
    }

    #[test]
    fn default_constants_have_no_definition() {
        let text = "    li sp, STACK_TOP\n";
        assert_eq!(find_definition(text, "STACK_TOP"), None);
        assert_eq!(find_references(text, "STACK_TOP", true), vec![Span::new(0, 11, 20)]);
    }

    #[test]
    fn rules_claim_in_order() {
        let loops = classify_references(PROGRAM, "loop", &ReferenceOptions::default());
        assert_eq!(
            loops.iter().map(|o| o.span).collect::<Vec<_>>(),
            vec![Span::new(4, 0, 4), Span::new(6, 12, 16), Span::new(6, 29, 33)]
        );
        assert_eq!(rules(&loops), vec![Rule::Declaration, Rule::ControlTransfer, Rule::BareWord]);

        let buffer = classify_references(PROGRAM, "buffer", &ReferenceOptions::default());
        assert_eq!(rules(&buffer), vec![Rule::LoadAddress, Rule::Declaration]);

        let size = classify_references(PROGRAM, "SIZE", &ReferenceOptions::default());
        assert_eq!(rules(&size), vec![Rule::Declaration, Rule::Immediate, Rule::BareWord]);
        assert_eq!(size[2].span, Span::new(12, 10, 14));
    }

    #[test]
    fn declaration_excluded_when_not_requested() {
        for name in ["loop", "buffer", "SIZE", "done", "main"] {
            let decl = find_definition(PROGRAM, name).unwrap();
            assert!(!find_references(PROGRAM, name, false).contains(&decl));
            assert!(find_references(PROGRAM, name, true).contains(&decl));
        }
    }

    #[test]
    fn comments_can_be_excluded() {
        let options = ReferenceOptions {
            include_declaration: false,
            search_comments: false,
        };
        assert_eq!(find_references_with(PROGRAM, "loop", &options), vec![Span::new(6, 12, 16)]);
    }

    #[test]
    fn whole_words_only() {
        let text = "loop:\nloop2:\n    j loop2\n    j loop\n";
        assert_eq!(
            find_references(text, "loop", false),
            vec![Span::new(3, 6, 10)]
        );
    }

    #[test]
    fn label_and_instruction_on_one_line() {
        let text = "spin: j spin\n";
        assert_eq!(
            find_references(text, "spin", true),
            vec![Span::new(0, 0, 4), Span::new(0, 8, 12)]
        );
    }

    #[test]
    fn mnemonics_are_case_insensitive() {
        let text = "    BEQ a0, a1, out\nout:\n";
        let occurrences = classify_references(text, "out", &ReferenceOptions::default());
        assert_eq!(occurrences[0].rule, Rule::ControlTransfer);
    }

    #[test]
    fn no_match_is_empty() {
        assert!(find_references(PROGRAM, "nowhere", true).is_empty());
        assert!(references_at(PROGRAM, Position::new(0, 0), &ReferenceOptions::default()).is_empty());
    }
}
