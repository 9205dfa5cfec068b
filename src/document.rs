//! Open documents and server configuration

use std::time::Duration;

use serde_json::Value;
use tower_lsp::lsp_types::Url;

use zx16lsp::completion::CompletionOptions;
use zx16lsp::references::ReferenceOptions;

/// Configuration for the language server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub validation_delay_ms: u64,
    pub suggest_default_constants: bool,
    pub references_in_comments: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            validation_delay_ms: 500,
            suggest_default_constants: true,
            references_in_comments: true,
        }
    }
}

impl Configuration {
    /// Update from `initializationOptions` or `didChangeConfiguration` settings.
    /// Keys that are missing or of the wrong type keep their current value.
    /// Settings nested under a `zx16` section are accepted as well.
    pub fn apply(&mut self, value: &Value) {
        let value = value.get("zx16").unwrap_or(value);

        self.validation_delay_ms = value
            .get("validationDelayMs")
            .and_then(Value::as_u64)
            .unwrap_or(self.validation_delay_ms);

        self.suggest_default_constants = value
            .get("suggestDefaultConstants")
            .and_then(Value::as_bool)
            .unwrap_or(self.suggest_default_constants);

        self.references_in_comments = value
            .get("referencesInComments")
            .and_then(Value::as_bool)
            .unwrap_or(self.references_in_comments);
    }

    pub fn validation_delay(&self) -> Duration {
        Duration::from_millis(self.validation_delay_ms)
    }

    pub fn completion_options(&self) -> CompletionOptions {
        CompletionOptions {
            include_default_constants: self.suggest_default_constants,
        }
    }

    pub fn reference_options(&self, include_declaration: bool) -> ReferenceOptions {
        ReferenceOptions {
            include_declaration,
            search_comments: self.references_in_comments,
        }
    }
}

/// The latest snapshot of a document, replaced wholesale on every change.
#[derive(Debug, Clone)]
pub struct DocumentData {
    pub url: Url,
    pub content: String,
    pub version: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct FileData {
    pub document_data: DocumentData,
}

impl FileData {
    pub fn new(url: Url, content: String, version: Option<i32>) -> Self {
        FileData {
            document_data: DocumentData {
                url,
                content,
                version,
            },
        }
    }
}
