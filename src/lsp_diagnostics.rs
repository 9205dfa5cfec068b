//! LSP Diagnostics Module
//!
//! Publishes duplicate-definition diagnostics for open documents. Results are
//! cached by a SHA-256 of the document URI and text, so re-validating an
//! unchanged buffer (save, reopen, toggling diagnostics) skips the scan.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use sha2::{Digest, Sha256};
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, Url};

use zx16lsp::diagnostics;

use crate::performance::TimingGuard;
use crate::Backend;

/// Upper bound on cached validation results.
pub const MAX_CACHED_DOCUMENTS: usize = 256;

/// Validation results keyed by content hash, evicting the oldest insert once
/// the bound is exceeded.
#[derive(Default)]
pub struct DiagnosticCache {
    entries: DashMap<String, (u64, Vec<Diagnostic>)>,
    sequence: AtomicU64,
}

impl DiagnosticCache {
    pub fn get(&self, key: &str) -> Option<Vec<Diagnostic>> {
        self.entries.get(key).map(|entry| entry.1.clone())
    }

    pub fn insert(&self, key: String, diagnostics: Vec<Diagnostic>) {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(key, (seq, diagnostics));
        while self.entries.len() > MAX_CACHED_DOCUMENTS {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|entry| entry.value().0)
                .map(|entry| entry.key().clone());
            match oldest {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Cache key for a document snapshot. The URI is part of the key because
/// related information points back into the document.
pub fn content_hash(uri: &Url, content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(uri.as_str().as_bytes());
    hasher.update([0u8]);
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Compute diagnostics for a single text buffer without a running server.
pub fn compute_diagnostics_for_text(uri: &Url, content: &str) -> Vec<Diagnostic> {
    diagnostics::validate(uri, content)
}

/// One line of `--diagnose` output.
pub fn format_diagnostic(d: &Diagnostic) -> String {
    let sev = match d.severity {
        Some(DiagnosticSeverity::ERROR) => "ERROR",
        Some(DiagnosticSeverity::WARNING) => "WARN",
        Some(DiagnosticSeverity::INFORMATION) => "INFO",
        Some(DiagnosticSeverity::HINT) => "HINT",
        _ => "UNKNOWN",
    };
    format!(
        "{}:{}:{} - {}",
        sev, d.range.start.line, d.range.start.character, d.message
    )
}

/// Run full diagnostics on a document and publish results
pub async fn run_diagnostics(backend: &Backend, uri: &Url) {
    let _timer = TimingGuard::new(&backend.perf_tracker, "lsp.server.diagnostics");
    backend.perf_tracker.increment("lsp.server.diagnostics.calls", 1);

    if !*backend.diagnostics_enabled.read().await {
        backend
            .client
            .publish_diagnostics(uri.clone(), vec![], None)
            .await;
        return;
    }

    let (content, version) = {
        let files = backend.files.read().await;
        let Some(file_data) = files.get(uri) else {
            return;
        };
        (
            file_data.document_data.content.clone(),
            file_data.document_data.version,
        )
    };

    let key = content_hash(uri, &content);
    let diagnostics = match backend.diagnostic_cache.get(&key) {
        Some(cached) => {
            backend
                .perf_tracker
                .increment("lsp.server.diagnostics.cache_hits", 1);
            cached
        }
        None => {
            backend
                .perf_tracker
                .increment("lsp.server.diagnostics.cache_misses", 1);
            let diagnostics = compute_diagnostics_for_text(uri, &content);
            backend.diagnostic_cache.insert(key, diagnostics.clone());
            diagnostics
        }
    };

    backend
        .client
        .publish_diagnostics(uri.clone(), diagnostics, version)
        .await;
}

/// Re-validate `uri` once edits have been quiet for the configured delay.
pub async fn schedule_diagnostics(backend: &Backend, uri: Url) {
    let delay = backend.config.read().await.validation_delay();
    let task_backend = backend.clone();
    let task_uri = uri.clone();
    backend.debouncer.schedule(uri, delay, async move {
        task_backend.run_diagnostics(&task_uri).await;
    });
}
