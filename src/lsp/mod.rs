//! Mu Language Server Protocol (LSP) implementation
//!
//! Provides IDE features:
//! - Incremental document sync
//! - Context-aware completions

pub mod backend;
pub mod position;

pub use backend::MuLanguageServer;
