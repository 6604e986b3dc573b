//! Completion candidate generation and ranking
//!
//! Candidates come from three sources: symbols of the scopes enclosing the cursor, the keyword table and the builtin
//! type table. A candidate is kept when its label starts with the word being typed, ignoring ASCII case.
//!
//! ## Ranking
//!
//! 1. Exact-case prefix matches before case-insensitive ones.
//! 2. Symbols of the innermost scope, then outer scopes by distance, then keywords, then types.
//! 3. Label, lexically.

use std::cmp::Ordering;
use std::collections::HashSet;

use mu_syntax::lexer::{Span, Token, TokenKind};

use super::document::DocumentSnapshot;
use super::scope::SymbolKind;
use super::vocabulary::{Vocabulary, VocabularyEntry};

/// One completion suggestion. `sort_rank` is its position in the ranked result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCandidate {
    pub label: String,
    pub kind: SymbolKind,
    pub sort_rank: usize,
    pub documentation: Option<String>,
}

/// The word being completed at a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionContext<'t> {
    /// Cursor clamped to the text and moved back to a character boundary
    pub cursor: usize,
    /// Text of the word token from its start up to the cursor; empty when not in a word
    pub prefix: &'t str,
    /// Span of the whole word token holding the prefix
    pub word: Option<Span>,
}

/// Work out what is being completed at `cursor`.
///
/// Returns `None` when the cursor is inside a string, character literal or comment.
pub fn completion_context<'t>(text: &'t str, tokens: &[Token], cursor: usize) -> Option<CompletionContext<'t>> {
    let mut cursor = cursor.min(text.len());
    while !text.is_char_boundary(cursor) {
        cursor -= 1;
    }
    let empty = CompletionContext {
        cursor,
        prefix: "",
        word: None,
    };
    if cursor == 0 {
        return Some(empty);
    }

    let index = tokens.partition_point(|t| t.span.end < cursor);
    let Some(token) = tokens.get(index) else {
        return Some(empty);
    };
    match token.kind {
        kind if kind.is_word() => Some(CompletionContext {
            cursor,
            prefix: &text[token.span.start..cursor],
            word: Some(token.span),
        }),
        TokenKind::String if cursor == token.span.end && is_terminated_string(&token.text) => Some(empty),
        TokenKind::Comment if cursor == token.span.end && is_terminated_block_comment(&token.text) => Some(empty),
        TokenKind::String | TokenKind::Comment => None,
        _ => Some(empty),
    }
}

fn is_terminated_string(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(quote) = chars.next() else {
        return false;
    };
    let mut escaped = false;
    for c in chars {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return true;
        }
    }
    false
}

fn is_terminated_block_comment(text: &str) -> bool {
    text.starts_with("/*") && text.len() >= 4 && text.ends_with("*/")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Source {
    /// Scope distance from the cursor
    Symbol(usize),
    Keyword,
    Type,
}

struct Ranked {
    exact: bool,
    source: Source,
    candidate: CompletionCandidate,
}

impl Ranked {
    fn cmp_key(&self, other: &Self) -> Ordering {
        other
            .exact
            .cmp(&self.exact)
            .then(self.source.cmp(&other.source))
            .then_with(|| self.candidate.label.cmp(&other.candidate.label))
    }
}

/// Whether `label` starts with `prefix`, ignoring ASCII case; `Some(true)` when the case matches too.
fn prefix_match(label: &str, prefix: &str) -> Option<bool> {
    let head = label.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then_some(head == prefix)
}

/// Ranked candidates for `cursor` in `snapshot`, at most `limit` of them.
#[tracing::instrument(skip_all, fields(version = snapshot.version(), cursor = cursor))]
pub fn complete(
    snapshot: &DocumentSnapshot,
    cursor: usize,
    vocabulary: &Vocabulary,
    limit: usize,
) -> Vec<CompletionCandidate> {
    let Some(context) = completion_context(snapshot.text(), snapshot.tokens(), cursor) else {
        tracing::debug!("cursor inside string or comment");
        return Vec::new();
    };
    let prefix = context.prefix;

    let mut seen: HashSet<&str> = HashSet::new();
    let mut ranked = Vec::new();
    let mut offer = |label: &str, kind: SymbolKind, documentation: Option<&String>, source: Source| {
        let Some(exact) = prefix_match(label, prefix) else {
            return;
        };
        ranked.push(Ranked {
            exact,
            source,
            candidate: CompletionCandidate {
                label: label.to_string(),
                kind,
                sort_rank: 0,
                documentation: documentation.cloned(),
            },
        });
    };

    for visible in snapshot.scopes().visible_symbols(context.cursor) {
        // The name being typed in a declaration is not a completion for itself.
        if context.word == Some(visible.span) {
            continue;
        }
        let symbol = visible.symbol;
        if seen.insert(symbol.name.as_str()) {
            offer(
                &symbol.name,
                symbol.declared_kind,
                symbol.documentation.as_ref(),
                Source::Symbol(visible.distance),
            );
        }
    }
    let tables: [(&[VocabularyEntry], SymbolKind, Source); 2] = [
        (vocabulary.keywords(), SymbolKind::Keyword, Source::Keyword),
        (vocabulary.types(), SymbolKind::Type, Source::Type),
    ];
    for (entries, kind, source) in tables {
        for entry in entries {
            if seen.insert(entry.label.as_str()) {
                offer(&entry.label, kind, entry.documentation.as_ref(), source);
            }
        }
    }

    ranked.sort_by(Ranked::cmp_key);
    ranked.truncate(limit);
    ranked
        .into_iter()
        .enumerate()
        .map(|(rank, r)| CompletionCandidate {
            sort_rank: rank,
            ..r.candidate
        })
        .collect()
}
