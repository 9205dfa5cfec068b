//! Hover documentation for the token under the cursor.

use crate::catalog::{alias_of, lookup_default_constant, lookup_directive, lookup_instruction, lookup_register};
use crate::symbols::{Symbol, SymbolTable};
use crate::text::{dotted_word_at, line_at};
use crate::types::{Position, Span};

/// Hover result. `title` is a code line, `body` is markdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverInfo {
    pub title: String,
    pub body: String,
    pub span: Span,
}

/// Resolution order: directive, instruction, register, default constant,
/// label, then `.equ`/`.set` symbol.
pub fn hover(text: &str, pos: Position) -> Option<HoverInfo> {
    let line = line_at(text, pos.line)?;
    let (span, word) = dotted_word_at(line, pos.line, pos.column)?;

    if let Some(bare) = word.strip_prefix('.') {
        if let Some(directive) = lookup_directive(&word) {
            return Some(HoverInfo {
                title: directive.template.to_string(),
                body: format!("**Directive** `{}`\n\n{}", directive.name, directive.description),
                span,
            });
        }
        // Unknown directive: fall back to the bare word after the dot.
        let span = Span::new(span.line, span.start + 1, span.end);
        return resolve_word(text, bare, span);
    }
    resolve_word(text, &word, span)
}

fn resolve_word(text: &str, word: &str, span: Span) -> Option<HoverInfo> {
    if let Some(ins) = lookup_instruction(word) {
        return Some(HoverInfo {
            title: ins.syntax(),
            body: format!("**{}**\n\n{}", ins.category, ins.semantics),
            span,
        });
    }

    if let (Some(reg), Some(other)) = (lookup_register(word), alias_of(word)) {
        return Some(HoverInfo {
            title: format!("{} ({})", reg.name, reg.alias),
            body: format!("**Register** `{word}`, also written `{other}`\n\n{}", reg.purpose),
            span,
        });
    }

    if let Some(constant) = lookup_default_constant(word) {
        return Some(HoverInfo {
            title: format!("{} = {}", constant.name, constant.value),
            body: format!("**Predefined constant**\n\n{}", constant.description),
            span,
        });
    }

    let table = SymbolTable::extract(text);
    let labels: Vec<&Symbol> = table.definitions(word).filter(|s| s.is_label()).collect();
    if let Some(first) = labels.first() {
        let mut body = format!("**Label** defined on line {}", first.span().line + 1);
        if labels.len() > 1 {
            body.push_str(&format!("\n\nDefined {} times", labels.len()));
        }
        return Some(HoverInfo {
            title: format!("{word}:"),
            body,
            span,
        });
    }

    let equate = table.definitions(word).find_map(|symbol| match symbol {
        Symbol::Equate {
            name,
            span: def,
            kind,
            value,
        } => Some(HoverInfo {
            title: format!("{kind} {name}, {value}"),
            body: format!(
                "**Constant** (`{kind}`) defined on line {}\n\nValue: `{value}`",
                def.line + 1
            ),
            span,
        }),
        Symbol::Label { .. } => None,
    });
    equate
}
