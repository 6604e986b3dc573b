//! Mu language vocabulary registries.
//!
//! This module is the “front door” for language-level vocabulary: reserved keywords and builtin types.
//!
//! Callers work with **stable IDs** (`KeywordId`, `BuiltinTypeId`) and look up spellings/metadata via the registry
//! tables instead of scattering string comparisons across the tokenizer and the completion engine.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no IO, no side effects.
//! - The tokenizer decides what a spelling *is*; registries only describe it.
//!
//! ## Examples
//! ```rust
//! use mu_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("class"), Some(KeywordId::Class));
//! assert_eq!(keywords::as_str(KeywordId::Class), "class");
//! ```

pub mod keywords;
pub mod registry;
pub mod types;
