//! Define the reserved keyword vocabulary for the Mu language.
//!
//! This module is the single source of truth for reserved words: a stable identifier ([`KeywordId`]) plus a const
//! metadata table ([`KEYWORDS`]) that records canonical spellings, categories, what a keyword declares, and a short
//! description used as completion documentation.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**: `Class` is an identifier, `class` is a keyword.
//! - Mu writes declarations as `function: name (...)`; the `:` is a tokenizer/scope concern, not a registry one.
//!
//! ## Examples
//! ```rust
//! use mu_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("for_each"), Some(KeywordId::ForEach));
//! assert_eq!(keywords::as_str(KeywordId::ForEach), "for_each");
//! assert_eq!(keywords::from_str("For_Each"), None);
//! ```

use super::registry::{DeclarationKind, LangItemInfo};

/// Stable identifier for every reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Declarations that may own a scope
    Module,
    Namespace,
    Class,
    Union,
    Interface,
    Function,
    Method,
    Operator,

    // Bindings
    Let,
    Var,
    Global,
    Const,

    // Modules
    Require,
    Use,

    // Control flow
    If,
    Then,
    Else,
    For,
    ForEach,
    ForIndex,
    Repeat,
    While,
    Do,
    Break,
    Continue,
    Return,
    Case,
    Try,
    Catch,
    Throw,

    // Literals / receivers
    True,
    False,
    Nil,
    This,

    // Documentation blocks
    Documentation,
}

/// High-level grouping for documentation and tooling.
///
/// ## Notes
/// - Categories are metadata only; they do not enforce parsing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Declaration,
    Binding,
    Module,
    ControlFlow,
    Literal,
    Documentation,
}

/// Metadata for a keyword.
///
/// ## Notes
/// - `declares` is `Some` for keywords whose following identifier names a new symbol.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub item: LangItemInfo<KeywordId>,
    pub category: KeywordCategory,
    pub declares: Option<DeclarationKind>,
}

/// Registry of all keywords.
///
/// ## Notes
/// - The ordering is not semantically meaningful, but is grouped for readability.
pub const KEYWORDS: &[KeywordInfo] = &[
    // Declarations
    decl(
        KeywordId::Module,
        "module",
        DeclarationKind::Namespace,
        "Declare a module; its body is a namespace scope.",
    ),
    decl(
        KeywordId::Namespace,
        "namespace",
        DeclarationKind::Namespace,
        "Declare a namespace scope.",
    ),
    decl(KeywordId::Class, "class", DeclarationKind::Type, "Declare a class type."),
    decl(
        KeywordId::Union,
        "union",
        DeclarationKind::Type,
        "Declare a tagged union (variant) type.",
    ),
    decl(
        KeywordId::Interface,
        "interface",
        DeclarationKind::Type,
        "Declare an interface type.",
    ),
    decl(
        KeywordId::Function,
        "function",
        DeclarationKind::Function,
        "Declare a function: `function: name (ret; params) { ... }`.",
    ),
    decl(
        KeywordId::Method,
        "method",
        DeclarationKind::Function,
        "Declare a method of the enclosing class.",
    ),
    decl(
        KeywordId::Operator,
        "operator",
        DeclarationKind::Function,
        "Declare an operator overload.",
    ),
    // Bindings
    binding(KeywordId::Let, "let", "Bind a local variable with an inferred type."),
    binding(KeywordId::Var, "var", "Bind a mutable local variable."),
    binding(KeywordId::Global, "global", "Declare a module-level variable."),
    binding(KeywordId::Const, "const", "Bind a constant."),
    // Modules
    info(
        KeywordId::Require,
        "require",
        KeywordCategory::Module,
        Some(DeclarationKind::Import),
        "Load a module and make its name available.",
    ),
    info(
        KeywordId::Use,
        "use",
        KeywordCategory::Module,
        Some(DeclarationKind::Import),
        "Bring a module's symbols into the current scope.",
    ),
    // Control flow
    control(KeywordId::If, "if", "Conditional statement or expression."),
    control(KeywordId::Then, "then", "Introduce the branch of an `if` expression."),
    control(KeywordId::Else, "else", "Alternative branch of an `if`."),
    control(KeywordId::For, "for", "C-style loop: `for (init; cond; step)`."),
    control(KeywordId::ForEach, "for_each", "Iterate over the elements of a collection."),
    control(KeywordId::ForIndex, "for_index", "Iterate over the indices of an array."),
    control(KeywordId::Repeat, "repeat", "Repeat a statement a fixed number of times."),
    control(KeywordId::While, "while", "Loop while a condition holds."),
    control(KeywordId::Do, "do", "Loop body evaluated before its `while` condition."),
    control(KeywordId::Break, "break", "Exit the innermost loop."),
    control(KeywordId::Continue, "continue", "Skip to the next loop iteration."),
    control(KeywordId::Return, "return", "Return from the enclosing function."),
    control(KeywordId::Case, "case", "Pattern match on a value."),
    control(KeywordId::Try, "try", "Run a block, handling exceptions in `catch`."),
    control(KeywordId::Catch, "catch", "Handle an exception raised in `try`."),
    control(KeywordId::Throw, "throw", "Raise an exception."),
    // Literals / receivers
    literal(KeywordId::True, "true", "Boolean true."),
    literal(KeywordId::False, "false", "Boolean false."),
    literal(KeywordId::Nil, "nil", "The empty reference value."),
    literal(KeywordId::This, "this", "The receiver inside a method."),
    // Documentation
    info(
        KeywordId::Documentation,
        "documentation",
        KeywordCategory::Documentation,
        None,
        "Attach documentation strings to symbols.",
    ),
];

/// Canonical spelling.
///
/// ## Parameters
/// - `id`: Keyword identifier.
///
/// ## Returns
/// - The keyword's canonical spelling.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).item.canonical
}

/// What the identifier following this keyword declares, if anything.
pub fn declares(id: KeywordId) -> Option<DeclarationKind> {
    info_for(id).declares
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS
        .iter()
        .find(|k| k.item.id == id)
        .expect("INVARIANT: every KeywordId has a registry entry")
}

/// Lookup by spelling.
///
/// ## Returns
/// - `Some(KeywordId)` if the spelling is reserved.
/// - `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.item.canonical == s).map(|k| k.item.id)
}

// --- helpers -----------------------------------------------------------------

const fn info(
    id: KeywordId,
    canonical: &'static str,
    category: KeywordCategory,
    declares: Option<DeclarationKind>,
    description: &'static str,
) -> KeywordInfo {
    KeywordInfo {
        item: LangItemInfo {
            id,
            canonical,
            description,
        },
        category,
        declares,
    }
}

const fn decl(id: KeywordId, canonical: &'static str, kind: DeclarationKind, description: &'static str) -> KeywordInfo {
    info(id, canonical, KeywordCategory::Declaration, Some(kind), description)
}

const fn binding(id: KeywordId, canonical: &'static str, description: &'static str) -> KeywordInfo {
    info(
        id,
        canonical,
        KeywordCategory::Binding,
        Some(DeclarationKind::Variable),
        description,
    )
}

const fn control(id: KeywordId, canonical: &'static str, description: &'static str) -> KeywordInfo {
    info(id, canonical, KeywordCategory::ControlFlow, None, description)
}

const fn literal(id: KeywordId, canonical: &'static str, description: &'static str) -> KeywordInfo {
    info(id, canonical, KeywordCategory::Literal, None, description)
}
