//! Token types for the Mu tokenizer.
//!
//! Keyword and builtin-type tokens carry **registry-backed IDs** so downstream code matches on
//! `TokenKind::Keyword(KeywordId::Class)` instead of comparing strings.
//!
//! ## Notes
//! - Whitespace and comments are real tokens; concatenating every token's `text` reproduces the source.
//! - Spans are byte offsets into the text the token was produced from.

use mu_core::lang::keywords::{self, KeywordId};
use mu_core::lang::types::{self, BuiltinTypeId};

/// Half-open byte range `[start, end)` in a source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Move the span by a signed byte delta.
    pub fn shifted(self, delta: isize) -> Self {
        Self {
            start: self.start.saturating_add_signed(delta),
            end: self.end.saturating_add_signed(delta),
        }
    }
}

/// Kind of token produced by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword(KeywordId),
    Identifier,
    Type(BuiltinTypeId),
    Number,
    /// String or character literal, possibly unterminated.
    String,
    Comment,
    Punctuation,
    Whitespace,
}

impl TokenKind {
    /// Whether the token is a keyword with the given id.
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == id)
    }

    /// Tokens whose text a user extends while typing a name.
    pub fn is_word(&self) -> bool {
        matches!(self, TokenKind::Keyword(_) | TokenKind::Identifier | TokenKind::Type(_))
    }
}

/// A token with its kind, source text and span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// Whether this is a punctuation token spelled exactly `p`.
    pub fn is_punct(&self, p: &str) -> bool {
        self.kind == TokenKind::Punctuation && self.text == p
    }
}

/// Classify an identifier spelling against the keyword and builtin-type registries.
pub fn classify_word(spelling: &str) -> TokenKind {
    if let Some(id) = keywords::from_str(spelling) {
        TokenKind::Keyword(id)
    } else if let Some(id) = types::from_str(spelling) {
        TokenKind::Type(id)
    } else {
        TokenKind::Identifier
    }
}
