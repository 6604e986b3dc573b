//! Syntax frontend for the Mu language: a tolerant tokenizer and incremental relexing.
//!
//! This crate is dependency-light and intended for reuse by the completion engine, the language server, and
//! command-line tooling.
//!
//! ## Notes
//! - This crate is intentionally “lexical-only”: it does not build scopes or resolve names.
//! - Vocabulary identity (keywords/builtin types) comes from `mu_core::lang` registries.
//! - Tokenizing never fails. Malformed input degrades to best-effort tokens.
//!
//! ## Examples
//! ```rust
//! use mu_syntax::lexer::{self, TokenKind};
//!
//! let tokens = lexer::lex("int x = 1;");
//! assert!(matches!(tokens[0].kind, TokenKind::Type(_)));
//! assert_eq!(tokens.iter().map(|t| t.text.as_str()).collect::<String>(), "int x = 1;");
//! ```

pub mod lexer;
