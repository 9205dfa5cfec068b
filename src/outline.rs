//! Flat document outline: labels and named constants in line order.

use tower_lsp::lsp_types::{DocumentSymbol, SymbolKind};

use crate::symbols::{Symbol, SymbolTable};

#[allow(deprecated)]
fn document_symbol(text: &str, symbol: &Symbol) -> DocumentSymbol {
    let (kind, detail) = match symbol {
        Symbol::Label { .. } => (SymbolKind::FUNCTION, None),
        Symbol::Equate { kind, value, .. } => (SymbolKind::CONSTANT, Some(format!("{kind} {value}"))),
    };
    let range = symbol.span().to_lsp_range(text);
    DocumentSymbol {
        name: symbol.name().to_string(),
        detail,
        kind,
        tags: None,
        deprecated: None,
        range,
        selection_range: range,
        children: None,
    }
}

pub fn document_symbols(text: &str) -> Vec<DocumentSymbol> {
    SymbolTable::extract(text)
        .iter()
        .map(|symbol| document_symbol(text, symbol))
        .collect()
}
