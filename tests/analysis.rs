use tower_lsp::lsp_types::Url;

use zx16lsp::completion::{completions, CompletionOptions, SuggestionKind};
use zx16lsp::diagnostics::validate;
use zx16lsp::hover::hover;
use zx16lsp::references::{definition_at, find_definition, find_references, references_at, ReferenceOptions};
use zx16lsp::types::{Position, Span};

const PROGRAM: &str = "\
# blink an LED on the MMIO port
.equ LED_PORT, MMIO_BASE
.equ DELAY, 100
.text
main:
    li sp, STACK_TOP
    la a0, LED_PORT
loop:
    call toggle
    li a1, DELAY
wait:
    addi a1, -1
    bnz a1, wait
    j loop
toggle:
    lw t0, 0(a0)
    xori t0, 1
    sw t0, 0(a0)
    ret
";

fn uri() -> Url {
    Url::parse("file:///work/blink.s").unwrap()
}

#[test]
fn clean_program_has_no_diagnostics() {
    assert!(validate(&uri(), PROGRAM).is_empty());
}

#[test]
fn introduced_duplicate_is_reported_on_both_lines() {
    let text = format!("{PROGRAM}wait:\n    nop\n");
    let diagnostics = validate(&uri(), &text);
    assert_eq!(diagnostics.len(), 2);
    let dup_line = text.lines().count() as u32 - 2;
    let first = diagnostics.iter().find(|d| d.range.start.line == 10).unwrap();
    let later = diagnostics.iter().find(|d| d.range.start.line == dup_line).unwrap();
    assert!(first.message.contains(&format!("line {}", dup_line + 1)));
    assert!(later.message.contains("line 11"));
}

#[test]
fn navigate_from_usage_to_definition_and_back() {
    // cursor on `toggle` in `call toggle`
    let def = definition_at(PROGRAM, Position::new(8, 11)).unwrap();
    assert_eq!(def, Span::new(14, 0, 6));

    let refs = references_at(PROGRAM, Position::new(14, 2), &ReferenceOptions::default());
    assert_eq!(refs, vec![Span::new(8, 9, 15), Span::new(14, 0, 6)]);

    let without_decl = find_references(PROGRAM, "toggle", false);
    assert_eq!(without_decl, vec![Span::new(8, 9, 15)]);
}

#[test]
fn default_constants_resolve_without_definition() {
    assert_eq!(find_definition(PROGRAM, "STACK_TOP"), None);
    assert_eq!(find_definition(PROGRAM, "MMIO_BASE"), None);
    assert_eq!(
        find_references(PROGRAM, "MMIO_BASE", true),
        vec![Span::new(1, 15, 24)]
    );
    let info = hover(PROGRAM, Position::new(5, 12)).unwrap();
    assert_eq!(info.title, "STACK_TOP = 0xEFFE");
}

#[test]
fn equ_symbols_are_found_through_load_address_and_immediates() {
    assert_eq!(
        find_references(PROGRAM, "LED_PORT", true),
        vec![Span::new(1, 5, 13), Span::new(6, 11, 19)]
    );
    assert_eq!(
        find_references(PROGRAM, "DELAY", true),
        vec![Span::new(2, 5, 10), Span::new(9, 11, 16)]
    );
}

#[test]
fn completion_contexts_are_exclusive() {
    let text = format!("{PROGRAM}    .");
    let last = text.lines().count() - 1;
    let after_dot = completions(&text, Position::new(last, 5), Some("."), &CompletionOptions::default());
    assert!(!after_dot.is_empty());
    assert!(after_dot.iter().all(|s| s.kind == SuggestionKind::Directive));
    assert!(after_dot.iter().all(|s| !s.insert_template.starts_with('.')));

    let normal = completions(PROGRAM, Position::new(9, 4), None, &CompletionOptions::default());
    assert!(normal.iter().all(|s| s.kind != SuggestionKind::Directive));
    for label in ["main", "loop", "wait", "toggle"] {
        assert!(normal
            .iter()
            .any(|s| s.kind == SuggestionKind::Label && s.label == label));
    }
    assert!(normal
        .iter()
        .any(|s| s.kind == SuggestionKind::Symbol && s.label == "LED_PORT"));
}

#[test]
fn comment_mentions_count_as_references_by_default() {
    let text = "loop:\n    j loop # spin on loop\n";
    assert_eq!(find_references(text, "loop", false).len(), 2);
}

#[test]
fn columns_reach_the_client_in_utf16_units() {
    let text = "loop:\n    j loop # \u{1F600} loop\n";
    let refs = find_references(text, "loop", false);
    assert_eq!(refs, vec![Span::new(1, 6, 10), Span::new(1, 15, 19)]);

    let ranges: Vec<_> = refs.iter().map(|span| span.to_lsp_range(text)).collect();
    assert_eq!((ranges[0].start.character, ranges[0].end.character), (6, 10));
    assert_eq!((ranges[1].start.character, ranges[1].end.character), (16, 20));

    // the client's column 18 sits inside the commented `loop`
    let cursor = Position::from_lsp(text, tower_lsp::lsp_types::Position::new(1, 18));
    assert_eq!(cursor, Position::new(1, 17));
    assert_eq!(references_at(text, cursor, &ReferenceOptions::default()).len(), 3);
}
