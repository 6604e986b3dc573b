//! Builtin type vocabulary.
//!
//! Mu's primitive types as registered by the language runtime, plus the handful of builtin reference types every
//! program can name without a `require`.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**, matching the tokenizer.
//! - This module is vocabulary only (spellings + metadata), not type-system semantics.
//!
//! ## Examples
//! ```rust
//! use mu_core::lang::types::{self, BuiltinTypeId};
//!
//! assert_eq!(types::from_str("int64"), Some(BuiltinTypeId::Int64));
//! assert_eq!(types::as_str(BuiltinTypeId::Half), "half");
//! ```

use super::registry::LangItemInfo;

/// Stable identifier for builtin types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinTypeId {
    Bool,
    Byte,
    Char,
    Short,
    Int,
    Int64,
    Half,
    Float,
    Double,
    String,
    Regex,
    Vector,
    Exception,
    Void,
}

/// Metadata for a builtin type.
pub type BuiltinTypeInfo = LangItemInfo<BuiltinTypeId>;

/// Registry of builtin types.
pub const BUILTIN_TYPES: &[BuiltinTypeInfo] = &[
    info(BuiltinTypeId::Bool, "bool", "Boolean value (`true` or `false`)."),
    info(BuiltinTypeId::Byte, "byte", "8-bit unsigned integer."),
    info(BuiltinTypeId::Char, "char", "Unicode code point."),
    info(BuiltinTypeId::Short, "short", "16-bit signed integer."),
    info(BuiltinTypeId::Int, "int", "32-bit signed integer."),
    info(BuiltinTypeId::Int64, "int64", "64-bit signed integer."),
    info(BuiltinTypeId::Half, "half", "16-bit floating point number."),
    info(BuiltinTypeId::Float, "float", "32-bit floating point number."),
    info(BuiltinTypeId::Double, "double", "64-bit floating point number."),
    info(BuiltinTypeId::String, "string", "Immutable Unicode string."),
    info(BuiltinTypeId::Regex, "regex", "Compiled regular expression."),
    info(
        BuiltinTypeId::Vector,
        "vector",
        "Fixed-size float vector, e.g. `vector float[3]`.",
    ),
    info(BuiltinTypeId::Exception, "exception", "Base type of thrown exceptions."),
    info(BuiltinTypeId::Void, "void", "No value; used as a function return type."),
];

/// Canonical spelling.
pub fn as_str(id: BuiltinTypeId) -> &'static str {
    info_for(id).canonical
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: BuiltinTypeId) -> &'static BuiltinTypeInfo {
    BUILTIN_TYPES
        .iter()
        .find(|t| t.id == id)
        .expect("INVARIANT: every BuiltinTypeId has a registry entry")
}

/// Resolve a type name to a [`BuiltinTypeId`].
///
/// ## Returns
/// - `Some(BuiltinTypeId)` if the spelling names a builtin type.
/// - `None` otherwise.
pub fn from_str(name: &str) -> Option<BuiltinTypeId> {
    BUILTIN_TYPES.iter().find(|t| t.canonical == name).map(|t| t.id)
}

const fn info(id: BuiltinTypeId, canonical: &'static str, description: &'static str) -> BuiltinTypeInfo {
    LangItemInfo {
        id,
        canonical,
        description,
    }
}
