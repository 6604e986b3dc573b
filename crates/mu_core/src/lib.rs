//! Canonical vocabulary for the Mu scripting language.
//!
//! This crate is intentionally small and dependency-free. It holds the registries the tokenizer uses to classify
//! identifier spellings and the completion engine uses to offer keywords and builtin types.
//!
//! ## Notes
//!
//! - This is a “vocabulary” crate: **no IO**, no global mutable state, and no editor-specific types.
//! - Mu is treated lexically here. Nothing in this crate describes grammar.

pub mod lang;
