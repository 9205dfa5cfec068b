//! LSP Handlers Module
//!
//! Navigation requests: go-to-definition, find-references and the document
//! outline. All three resolve against the current snapshot only.

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;

use zx16lsp::outline;
use zx16lsp::references;
use zx16lsp::types::Position as TextPosition;

use crate::performance::TimingGuard;
use crate::Backend;

/// Handle document symbol request for outline view
pub async fn handle_document_symbol(
    backend: &Backend,
    params: DocumentSymbolParams,
) -> Result<Option<DocumentSymbolResponse>> {
    let files = backend.files.read().await;
    let Some(file_data) = files.get(&params.text_document.uri) else {
        return Err(tower_lsp::jsonrpc::Error::invalid_request());
    };

    let symbols = outline::document_symbols(&file_data.document_data.content);
    Ok(Some(DocumentSymbolResponse::Nested(symbols)))
}

/// Handle goto definition request for navigation
pub async fn handle_goto_definition(
    backend: &Backend,
    params: GotoDefinitionParams,
) -> Result<Option<GotoDefinitionResponse>> {
    let _timer = TimingGuard::new(&backend.perf_tracker, "lsp.server.definition");
    backend.perf_tracker.increment("lsp.server.definition.calls", 1);

    let uri = params.text_document_position_params.text_document.uri;
    let files = backend.files.read().await;
    let Some(file_data) = files.get(&uri) else {
        return Err(tower_lsp::jsonrpc::Error::invalid_request());
    };

    let content = &file_data.document_data.content;
    let position = TextPosition::from_lsp(content, params.text_document_position_params.position);
    let definition = references::definition_at(content, position);
    let url = &file_data.document_data.url;
    Ok(definition.map(|span| {
        GotoDefinitionResponse::Scalar(Location::new(url.clone(), span.to_lsp_range(content)))
    }))
}

/// Handle find-references request
pub async fn handle_references(
    backend: &Backend,
    params: ReferenceParams,
) -> Result<Option<Vec<Location>>> {
    let _timer = TimingGuard::new(&backend.perf_tracker, "lsp.server.references");
    backend.perf_tracker.increment("lsp.server.references.calls", 1);

    let options = backend
        .config
        .read()
        .await
        .reference_options(params.context.include_declaration);

    let uri = params.text_document_position.text_document.uri;
    let files = backend.files.read().await;
    let Some(file_data) = files.get(&uri) else {
        return Err(tower_lsp::jsonrpc::Error::invalid_request());
    };

    let content = &file_data.document_data.content;
    let position = TextPosition::from_lsp(content, params.text_document_position.position);
    let locations = references::references_at(content, position, &options)
        .into_iter()
        .map(|span| Location::new(uri.clone(), span.to_lsp_range(content)))
        .collect();
    Ok(Some(locations))
}
