//! # Completion Handler Module
//!
//! Converts the library's ranked suggestions into LSP completion items.
//! Directive, instruction and register entries carry snippet templates;
//! ordering is expressed through `sort_text`.

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;

use zx16lsp::completion::{self, Suggestion, SuggestionKind};
use zx16lsp::types::Position as TextPosition;

use crate::performance;

fn item_kind(kind: SuggestionKind) -> CompletionItemKind {
    match kind {
        SuggestionKind::Directive => CompletionItemKind::KEYWORD,
        SuggestionKind::Instruction => CompletionItemKind::FUNCTION,
        SuggestionKind::Register => CompletionItemKind::VARIABLE,
        SuggestionKind::Label => CompletionItemKind::REFERENCE,
        SuggestionKind::Symbol | SuggestionKind::Constant => CompletionItemKind::CONSTANT,
    }
}

fn category(kind: SuggestionKind) -> &'static str {
    match kind {
        SuggestionKind::Directive => "directive",
        SuggestionKind::Instruction => "instruction",
        SuggestionKind::Register => "register",
        SuggestionKind::Label => "label",
        SuggestionKind::Symbol => "symbol",
        SuggestionKind::Constant => "predefined",
    }
}

pub fn to_completion_item(suggestion: Suggestion) -> CompletionItem {
    let is_snippet = suggestion.insert_template.contains("${");
    CompletionItem {
        sort_text: Some(suggestion.sort_text()),
        label_details: Some(CompletionItemLabelDetails {
            detail: None,
            description: Some(category(suggestion.kind).to_string()),
        }),
        kind: Some(item_kind(suggestion.kind)),
        detail: Some(suggestion.detail),
        documentation: suggestion.documentation.map(Documentation::String),
        insert_text: Some(suggestion.insert_template),
        insert_text_format: Some(if is_snippet {
            InsertTextFormat::SNIPPET
        } else {
            InsertTextFormat::PLAIN_TEXT
        }),
        label: suggestion.label,
        ..Default::default()
    }
}

/// Main completion handler function that processes completion requests
pub async fn handle_completion(
    backend: &crate::Backend,
    params: CompletionParams,
) -> Result<Option<CompletionResponse>> {
    let _timer = performance::TimingGuard::new(&backend.perf_tracker, "lsp.server.completion");
    backend.perf_tracker.increment("lsp.server.completion.calls", 1);

    let uri = params.text_document_position.text_document.uri;
    let position = params.text_document_position.position;
    let trigger = params.context.and_then(|ctx| ctx.trigger_character);
    let options = backend.config.read().await.completion_options();

    let files = backend.files.read().await;
    let Some(file_data) = files.get(&uri) else {
        return Err(tower_lsp::jsonrpc::Error::invalid_request());
    };

    let content = &file_data.document_data.content;
    let items: Vec<CompletionItem> = completion::completions(
        content,
        TextPosition::from_lsp(content, position),
        trigger.as_deref(),
        &options,
    )
    .into_iter()
    .map(to_completion_item)
    .collect();

    Ok(Some(CompletionResponse::Array(items)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_items_are_marked() {
        let item = to_completion_item(Suggestion {
            label: "beq".to_string(),
            kind: SuggestionKind::Instruction,
            detail: "beq rs1, rs2, label (B-type)".to_string(),
            insert_template: "beq ${1:rs1}, ${2:rs2}, ${3:label}".to_string(),
            documentation: Some("if (rs1 == rs2) pc = label".to_string()),
        });
        assert_eq!(item.kind, Some(CompletionItemKind::FUNCTION));
        assert_eq!(item.insert_text_format, Some(InsertTextFormat::SNIPPET));
        assert_eq!(item.sort_text.as_deref(), Some("1beq"));
    }

    #[test]
    fn plain_items_stay_plain() {
        let item = to_completion_item(Suggestion {
            label: "loop".to_string(),
            kind: SuggestionKind::Label,
            detail: "label".to_string(),
            insert_template: "loop".to_string(),
            documentation: None,
        });
        assert_eq!(item.insert_text_format, Some(InsertTextFormat::PLAIN_TEXT));
        assert_eq!(item.sort_text.as_deref(), Some("3loop"));
        assert!(item.documentation.is_none());
    }
}
