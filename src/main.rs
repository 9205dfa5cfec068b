//! # ZX16 Language Server (zx16lsp)
//!
//! Language Server Protocol implementation for ZX16 assembly, the 16-bit
//! RISC-style instruction set with eight registers (`x0`..`x7`, ABI names
//! `t0 ra sp s0 s1 t1 a0 a1`).
//!
//! ## Key Features
//! - Duplicate label and `.equ` diagnostics, re-validated after edits settle
//! - Context-aware completion for instructions, registers, directives and symbols
//! - Hover documentation from the instruction/register/directive catalog
//! - Go-to-definition, find-references and a document outline
//!
//! ## Architecture
//! The analysis lives in the `zx16lsp` library and works on plain text. This
//! binary owns the document store and configuration and adapts the library
//! results to tower-lsp types:
//! - `lsp_diagnostics` - validation, caching and debounced publishing
//! - `lsp_completion` / `lsp_hover` - completion items and hover contents
//! - `lsp_handlers` - definition, references, document symbols

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::RwLock;
use tower_lsp::{async_trait, jsonrpc::Result, lsp_types::*, Client};
use tower_lsp::{LanguageServer, LspService, Server};

use zx16lsp::catalog::{DIRECTIVES, INSTRUCTIONS};
use zx16lsp::debounce::Debouncer;

mod cli;
mod document;
mod lsp_completion;
mod lsp_diagnostics;
mod lsp_handlers;
mod lsp_hover;
mod performance;

use document::{Configuration, FileData};

const CMD_VERSION: &str = "version";
const CMD_SET_DIAGNOSTICS: &str = "zx16.setDiagnostics";
const CMD_ENABLE_BENCHMARKING: &str = "zx16.server.enableBenchmarking";
const CMD_BENCHMARK_REPORT: &str = "zx16.server.getBenchmarkReport";

const DEFAULT_PORT: u16 = 9257;

#[derive(Clone)]
struct Backend {
    client: Client,
    files: Arc<RwLock<HashMap<Url, FileData>>>,
    config: Arc<RwLock<Configuration>>,
    // Runtime flag to allow diagnostics suppression without restart
    diagnostics_enabled: Arc<RwLock<bool>>,
    perf_tracker: Arc<performance::PerformanceTracker>,
    // At most one pending validation per document
    debouncer: Arc<Debouncer<Url>>,
    diagnostic_cache: Arc<lsp_diagnostics::DiagnosticCache>,
}

#[async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        if let Some(init_options) = params.initialization_options {
            let mut config = self.config.write().await;
            config.apply(&init_options);
            self.client
                .log_message(MessageType::INFO, format!("Initial configuration: {:?}", *config))
                .await;
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::FULL),
                        save: Some(TextDocumentSyncSaveOptions::Supported(true)),
                        ..Default::default()
                    },
                )),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: vec![
                        CMD_VERSION.to_string(),
                        CMD_SET_DIAGNOSTICS.to_string(),
                        CMD_ENABLE_BENCHMARKING.to_string(),
                        CMD_BENCHMARK_REPORT.to_string(),
                    ],
                    work_done_progress_options: WorkDoneProgressOptions {
                        work_done_progress: None,
                    },
                }),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                definition_provider: Some(OneOf::Left(true)),
                references_provider: Some(OneOf::Left(true)),
                document_symbol_provider: Some(OneOf::Left(true)),
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(false),
                    trigger_characters: Some(vec![".".to_string(), " ".to_string()]),
                    completion_item: Some(CompletionOptionsCompletionItem {
                        label_details_support: Some(true),
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "zx16lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        self.client
            .log_message(
                MessageType::INFO,
                format!(
                    "ZX16LSP ready: instructions={} directives={}",
                    INSTRUCTIONS.len(),
                    DIRECTIVES.len()
                ),
            )
            .await;
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        match params.command.as_str() {
            CMD_VERSION => {
                self.client
                    .show_message(
                        MessageType::INFO,
                        concat!("ZX16LSP Version: ", env!("CARGO_PKG_VERSION")),
                    )
                    .await;
            }
            CMD_SET_DIAGNOSTICS => {
                if let Some(enabled) = params.arguments.first().and_then(Value::as_bool) {
                    *self.diagnostics_enabled.write().await = enabled;
                    if !enabled {
                        self.debouncer.cancel_all();
                    }
                    // re-run or clear diagnostics for all open documents
                    for uri in self.open_documents().await {
                        self.run_diagnostics(&uri).await;
                    }
                }
            }
            CMD_ENABLE_BENCHMARKING => {
                if let Some(enabled) = params.arguments.first().and_then(Value::as_bool) {
                    self.perf_tracker.set_enabled(enabled);
                    let message = if enabled {
                        "ZX16 LSP Server benchmarking enabled. Collecting performance data..."
                    } else {
                        "ZX16 LSP Server benchmarking disabled."
                    };
                    self.client.show_message(MessageType::INFO, message).await;
                }
            }
            CMD_BENCHMARK_REPORT => {
                let report = format!(
                    "{}Diagnostic cache entries: {}\n",
                    self.perf_tracker.generate_report(),
                    self.diagnostic_cache.len()
                );
                self.client.log_message(MessageType::INFO, report.clone()).await;
                return Ok(Some(Value::String(report)));
            }
            other => {
                self.client
                    .log_message(MessageType::WARNING, format!("Unknown command: {other}"))
                    .await;
            }
        }
        Ok(None)
    }

    async fn shutdown(&self) -> Result<()> {
        self.debouncer.cancel_all();
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        self.update_content(doc.uri.clone(), doc.text, Some(doc.version))
            .await;
        self.run_diagnostics(&doc.uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        // Full sync: the last change holds the whole document
        if let Some(change) = params.content_changes.into_iter().last() {
            self.update_content(uri.clone(), change.text, Some(params.text_document.version))
                .await;
        }
        lsp_diagnostics::schedule_diagnostics(self, uri).await;
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;
        if let Some(text) = params.text {
            self.update_content(uri.clone(), text, None).await;
        }
        self.debouncer.cancel(&uri);
        self.run_diagnostics(&uri).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.debouncer.cancel(&uri);
        self.files.write().await.remove(&uri);
        self.client.publish_diagnostics(uri, vec![], None).await;
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        {
            let mut config = self.config.write().await;
            config.apply(&params.settings);
            self.client
                .log_message(MessageType::INFO, format!("Configuration updated: {:?}", *config))
                .await;
        }
        for uri in self.open_documents().await {
            self.run_diagnostics(&uri).await;
        }
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        lsp_handlers::handle_document_symbol(self, params).await
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        lsp_completion::handle_completion(self, params).await
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        lsp_handlers::handle_goto_definition(self, params).await
    }

    async fn references(&self, params: ReferenceParams) -> Result<Option<Vec<Location>>> {
        lsp_handlers::handle_references(self, params).await
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        lsp_hover::handle_hover(self, params).await
    }
}

impl Backend {
    fn new(client: Client) -> Self {
        Backend {
            client,
            files: Arc::new(RwLock::new(HashMap::new())),
            config: Arc::new(RwLock::new(Configuration::default())),
            diagnostics_enabled: Arc::new(RwLock::new(true)),
            perf_tracker: Arc::new(performance::PerformanceTracker::new()),
            debouncer: Arc::new(Debouncer::new()),
            diagnostic_cache: Arc::new(lsp_diagnostics::DiagnosticCache::default()),
        }
    }

    async fn update_content(&self, uri: Url, text: String, version: Option<i32>) {
        let mut files = self.files.write().await;
        match files.entry(uri) {
            std::collections::hash_map::Entry::Vacant(entry) => {
                let key = entry.key().clone();
                entry.insert(FileData::new(key, text, version));
            }
            std::collections::hash_map::Entry::Occupied(mut entry) => {
                let document = &mut entry.get_mut().document_data;
                document.content = text;
                if version.is_some() {
                    document.version = version;
                }
            }
        }
    }

    async fn open_documents(&self) -> Vec<Url> {
        self.files.read().await.keys().cloned().collect()
    }

    /// Run full diagnostics on a document - delegates to lsp_diagnostics module
    async fn run_diagnostics(&self, uri: &Url) {
        lsp_diagnostics::run_diagnostics(self, uri).await
    }
}

/// `--diagnose` mode: validate each file and print the results to stdout.
fn diagnose(paths: &[std::path::PathBuf]) -> ExitCode {
    let mut status = ExitCode::SUCCESS;
    for path in paths {
        let path_ref = Path::new(path);
        let content = match fs::read_to_string(path_ref) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Could not read {}: {e}", path_ref.display());
                status = ExitCode::FAILURE;
                continue;
            }
        };
        let uri = match fs::canonicalize(path_ref).ok().and_then(|p| Url::from_file_path(p).ok()) {
            Some(uri) => uri,
            None => {
                eprintln!("Could not build a file URI for {}", path_ref.display());
                status = ExitCode::FAILURE;
                continue;
            }
        };

        let diagnostics = lsp_diagnostics::compute_diagnostics_for_text(&uri, &content);

        println!("Diagnostics for {}:", path_ref.display());
        if diagnostics.is_empty() {
            println!("  (no diagnostics)");
        }
        for d in &diagnostics {
            println!("  {}", lsp_diagnostics::format_diagnostic(d));
        }
        println!();
    }
    status
}

#[tokio::main]
async fn main() -> ExitCode {
    use clap::Parser as _;
    let cli = cli::Cli::parse();

    if !cli.diagnose.is_empty() {
        return diagnose(&cli.diagnose);
    }

    let (service, socket) = LspService::new(Backend::new);

    if !cli.listen && cli.host.is_none() {
        // stdin/stdout
        Server::new(tokio::io::stdin(), tokio::io::stdout(), socket)
            .serve(service)
            .await;
    } else if cli.listen {
        let host = match cli
            .host
            .map(Cow::Owned)
            .unwrap_or(Cow::Borrowed("127.0.0.1"))
            .parse::<Ipv4Addr>()
        {
            Ok(host) => host,
            Err(e) => {
                eprintln!("Could not parse IP address: {e}");
                return ExitCode::FAILURE;
            }
        };
        let port = cli.port.unwrap_or(DEFAULT_PORT);

        let stream = match TcpListener::bind((host, port)).await {
            Ok(listener) => match listener.accept().await {
                Ok((stream, _)) => stream,
                Err(e) => {
                    eprintln!("Could not accept connection: {e}");
                    return ExitCode::FAILURE;
                }
            },
            Err(e) => {
                eprintln!("Could not bind {host}:{port}: {e}");
                return ExitCode::FAILURE;
            }
        };

        let (input, output) = tokio::io::split(stream);
        Server::new(input, output, socket).serve(service).await;
    } else {
        let (Some(host), Some(port)) = (cli.host, cli.port) else {
            eprintln!("Connecting requires both --host and --port");
            return ExitCode::FAILURE;
        };

        let stream = match TcpStream::connect((host.as_str(), port)).await {
            Ok(stream) => stream,
            Err(e) => {
                eprintln!("Could not open TCP stream to {host}:{port}: {e}");
                return ExitCode::FAILURE;
            }
        };

        let (input, output) = tokio::io::split(stream);
        Server::new(input, output, socket).serve(service).await;
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use lsp_diagnostics::content_hash;

    fn uri() -> Url {
        Url::parse("file:///tmp/edit.s").unwrap()
    }

    async fn open(backend: &Backend, text: &str) {
        backend
            .did_open(DidOpenTextDocumentParams {
                text_document: TextDocumentItem::new(uri(), "zx16".to_string(), 1, text.to_string()),
            })
            .await;
    }

    async fn change(backend: &Backend, version: i32, text: &str) {
        backend
            .did_change(DidChangeTextDocumentParams {
                text_document: VersionedTextDocumentIdentifier::new(uri(), version),
                content_changes: vec![TextDocumentContentChangeEvent {
                    range: None,
                    range_length: None,
                    text: text.to_string(),
                }],
            })
            .await;
    }

    fn validation_runs(backend: &Backend) -> String {
        let report = backend.perf_tracker.generate_report();
        report
            .lines()
            .find(|line| line.trim_start().starts_with("lsp.server.diagnostics.calls:"))
            .map(|line| line.trim().to_string())
            .unwrap_or_default()
    }

    #[tokio::test(start_paused = true)]
    async fn edit_burst_validates_last_snapshot_once() {
        let (service, _socket) = LspService::new(Backend::new);
        let backend = service.inner();
        backend.perf_tracker.set_enabled(true);

        open(backend, "main:\n").await;
        let mut last = String::new();
        for version in 2..7 {
            last = format!("main:\n{}", "    nop\n".repeat(version as usize));
            change(backend, version, &last).await;
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(backend.debouncer.is_pending(&uri()));
        assert_eq!(validation_runs(backend), "lsp.server.diagnostics.calls: 1");

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(!backend.debouncer.is_pending(&uri()));
        assert_eq!(validation_runs(backend), "lsp.server.diagnostics.calls: 2");
        assert!(backend.diagnostic_cache.get(&content_hash(&uri(), &last)).is_some());
        assert_eq!(backend.diagnostic_cache.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn save_replaces_pending_validation() {
        let (service, _socket) = LspService::new(Backend::new);
        let backend = service.inner();
        backend.perf_tracker.set_enabled(true);

        open(backend, "main:\n").await;
        change(backend, 2, "main:\nmain:\n").await;
        assert!(backend.debouncer.is_pending(&uri()));

        backend
            .did_save(DidSaveTextDocumentParams {
                text_document: TextDocumentIdentifier::new(uri()),
                text: None,
            })
            .await;
        assert!(!backend.debouncer.is_pending(&uri()));
        assert_eq!(validation_runs(backend), "lsp.server.diagnostics.calls: 2");
        assert!(backend
            .diagnostic_cache
            .get(&content_hash(&uri(), "main:\nmain:\n"))
            .is_some_and(|diagnostics| diagnostics.len() == 2));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(validation_runs(backend), "lsp.server.diagnostics.calls: 2");
    }
}
