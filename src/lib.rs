//! # ZX16 Analysis Library
//!
//! Static analysis for ZX16 assembly source: the instruction/register/directive
//! catalog and the text-level passes the language server is built on. Every
//! pass is a pure function of the document text, re-run from scratch for each
//! request.
//!
//! ## Modules
//! - `catalog` - Instructions, registers, directives and predefined constants
//! - `symbols` - Label and `.equ`/`.set` extraction
//! - `diagnostics` - Duplicate definition diagnostics
//! - `references` - Go-to-definition and find-references
//! - `completion` - Context-sensitive completion candidates
//! - `hover` - Hover documentation
//! - `outline` - Document symbols
//! - `debounce` - Per-document delayed validation

pub mod catalog;
pub mod completion;
pub mod debounce;
pub mod diagnostics;
pub mod hover;
pub mod outline;
pub mod references;
pub mod symbols;
pub mod text;
pub mod types;
