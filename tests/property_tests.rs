//! Property-based tests for the completion engine
//!
//! These tests use proptest to drive the workspace with random documents and edit sequences, checking that
//! incremental maintenance never drifts from a from-scratch analysis and that completion stays within its contract.

use mu_complete::engine::completion::completion_context;
use mu_complete::engine::{DocumentId, Workspace};
use mu_complete::EngineConfig;
use mu_syntax::lexer;
use proptest::prelude::*;

// Mu-ish fragments; braces, quotes and newlines exercise every reparse kind.
const FRAGMENTS: &[&str] = &[
    "class", "function", "method", "namespace", "let", "var", "require", "int", "float", "string", ":", " ", "\n",
    "\n\n", "{", "}", "(", ")", ";", ",", "=", "[3]", "foo", "bar", "total", "t", "\"", "'", "//", "/*", "*/", "1.5",
    "✓",
];

fn source_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..40).prop_map(|parts| parts.concat())
}

/// An edit as (start, removed length, inserted text); positions are snapped to the document when applied.
fn edit_strategy() -> impl Strategy<Value = (usize, usize, String)> {
    (0usize..300, 0usize..12, prop::collection::vec(prop::sample::select(FRAGMENTS), 0..4))
        .prop_map(|(start, removed, parts)| (start, removed, parts.concat()))
}

fn floor_boundary(text: &str, mut offset: usize) -> usize {
    offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

fn id() -> DocumentId {
    DocumentId::from("prop.mu")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Property: tokens and scopes after any edit sequence equal a fresh analysis of the resulting text
    #[test]
    fn incremental_matches_fresh(
        source in source_strategy(),
        edits in prop::collection::vec(edit_strategy(), 1..6),
        incremental in any::<bool>(),
    ) {
        let mut ws = Workspace::new(EngineConfig::new().with_incremental(incremental));
        ws.open(id(), source);

        for (start, removed, inserted) in edits {
            let text = ws.snapshot(&id()).unwrap().text().to_string();
            let start = floor_boundary(&text, start);
            let end = floor_boundary(&text, start + removed).max(start);
            ws.on_edit(&id(), start..end, &inserted).unwrap();

            let snapshot = ws.snapshot(&id()).unwrap();
            let expected = lexer::lex(snapshot.text());
            prop_assert_eq!(snapshot.tokens(), expected.as_slice());

            let mut fresh = Workspace::default();
            fresh.open(id(), snapshot.text());
            let fresh_snapshot = fresh.snapshot(&id()).unwrap();
            prop_assert_eq!(snapshot.scopes(), fresh_snapshot.scopes());
        }
    }

    /// Property: completion returns at most the limit, each candidate a case-insensitive prefix match
    #[test]
    fn candidates_are_bounded_prefix_matches(
        source in source_strategy(),
        cursor in 0usize..400,
        limit in 0usize..60,
    ) {
        let mut ws = Workspace::new(EngineConfig::new().with_max_candidates(limit));
        ws.open(id(), source);
        let snapshot = ws.snapshot(&id()).unwrap();
        let completion = ws.complete(&id(), cursor).unwrap();
        prop_assert!(completion.candidates.len() <= limit);

        match completion_context(snapshot.text(), snapshot.tokens(), cursor) {
            Some(context) => {
                let prefix = context.prefix.to_ascii_lowercase();
                for (rank, candidate) in completion.candidates.iter().enumerate() {
                    prop_assert!(candidate.label.to_ascii_lowercase().starts_with(&prefix));
                    prop_assert_eq!(candidate.sort_rank, rank);
                }
            }
            None => prop_assert!(completion.candidates.is_empty()),
        }
    }

    /// Property: completing twice without an edit gives the same answer
    #[test]
    fn completion_is_idempotent(source in source_strategy(), cursor in 0usize..400) {
        let mut ws = Workspace::default();
        ws.open(id(), source);
        let first = ws.complete(&id(), cursor).unwrap();
        let second = ws.complete(&id(), cursor).unwrap();
        prop_assert_eq!(first, second);
    }
}
