//! LSP Hover Module

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{Hover, HoverContents, HoverParams, LanguageString, MarkedString};

use zx16lsp::hover::{self, HoverInfo};
use zx16lsp::types::Position;

use crate::Backend;

pub fn to_hover(text: &str, info: HoverInfo) -> Hover {
    Hover {
        contents: HoverContents::Array(vec![
            MarkedString::LanguageString(LanguageString {
                language: "zx16".to_string(),
                value: info.title,
            }),
            MarkedString::String(info.body),
        ]),
        range: Some(info.span.to_lsp_range(text)),
    }
}

/// Handle hover requests
pub async fn handle_hover(backend: &Backend, params: HoverParams) -> Result<Option<Hover>> {
    let _timer = crate::performance::TimingGuard::new(&backend.perf_tracker, "lsp.server.hover");
    backend.perf_tracker.increment("lsp.server.hover.calls", 1);

    let files = backend.files.read().await;
    let Some(file_data) = files.get(&params.text_document_position_params.text_document.uri)
    else {
        return Err(tower_lsp::jsonrpc::Error::invalid_request());
    };

    let content = &file_data.document_data.content;
    let position = Position::from_lsp(content, params.text_document_position_params.position);
    Ok(hover::hover(content, position).map(|info| to_hover(content, info)))
}
