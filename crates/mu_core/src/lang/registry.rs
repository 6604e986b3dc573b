//! Shareable metadata for `mu_core::lang` registries.
//!
//! ## Notes
//! - These types are `Copy` so registries can live in `const` tables.
//! - Metadata is meant for tooling (completion documentation, guardrail tests); classification still lives in the
//!   tokenizer.

/// Shared metadata shape for “registry-first” vocabulary items.
///
/// Registries that need extra per-item data (e.g. keyword category) wrap this struct in an “extension” info type.
///
/// ## Notes
/// - `description` is mandatory so every completion candidate from a registry carries documentation.
///
/// ## Examples
/// ```rust
/// use mu_core::lang::registry::LangItemInfo;
///
/// let item = LangItemInfo { id: 1u8, canonical: "int", description: "32-bit signed integer." };
/// assert_eq!(item.canonical, "int");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LangItemInfo<Id> {
    pub id: Id,
    pub canonical: &'static str,
    pub description: &'static str,
}

/// What a declaring keyword introduces, independent of how a consumer models scopes.
///
/// ## Notes
/// - `Import` covers `require`/`use`; the identifier that follows names a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Namespace,
    Type,
    Function,
    Variable,
    Import,
}
