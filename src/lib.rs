#![forbid(unsafe_code)]
//! Context-aware incremental completion for the Mu language
//!
//! The engine keeps every open document tokenized and scoped, updates both incrementally on each edit, and answers
//! completion requests from the scopes enclosing the cursor plus the keyword and builtin type tables. Two hosts sit
//! on top of it: a language server (`mu-lsp`) and a command-line tool (`mu-complete`).
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`. Malformed Mu source is never an error: it degrades to best-effort tokens and
//!   scopes.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod config;
pub mod engine;
pub mod lsp;

pub use config::{ConfigError, EngineConfig};
pub use engine::{Completion, CompletionCandidate, DocumentId, EngineError, EngineResult, Workspace};
