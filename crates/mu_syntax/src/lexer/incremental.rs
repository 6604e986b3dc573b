//! Incremental relexing.
//!
//! After an edit, only the tokens around the edited bytes can change. [`relex`] restarts the lexer one token
//! before the edit (the previous token's lookahead may have seen the edited bytes) and stops as soon as the
//! produced stream lines up with an old token boundary past the edit. Everything after that point is reused
//! and shifted by the edit's length delta.
//!
//! ## Notes
//! - The result is always identical to lexing the whole new text; the region only widens the relexed range.
//! - A region covering the whole old document never synchronizes, which gives a full relex.

use super::tokenize;
use super::tokens::{Span, Token};

/// A replacement of `[start, old_end)` in the old text by `[start, new_end)` in the new text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChange {
    pub start: usize,
    pub old_end: usize,
    pub new_end: usize,
}

impl TextChange {
    pub fn new(start: usize, old_end: usize, new_end: usize) -> Self {
        Self { start, old_end, new_end }
    }

    /// Signed length difference, new minus old.
    pub fn delta(&self) -> isize {
        self.new_end as isize - self.old_end as isize
    }
}

/// What a call to [`relex`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relexed {
    /// Index of the first replaced token (same in the old and new vectors).
    pub first: usize,
    /// Old tokens removed.
    pub replaced: usize,
    /// New tokens inserted in their place.
    pub produced: usize,
    /// Byte range covered by the removed tokens, old coordinates.
    pub old: Span,
    /// Byte range covered by the inserted tokens, new coordinates.
    pub new: Span,
}

/// Relex `tokens` (a full lex of the old text) in place so it becomes a full lex of `new_text`.
///
/// `region` is a pre-edit byte range that must be relexed even if the stream synchronizes earlier.
#[tracing::instrument(skip_all, fields(start = change.start, old_end = change.old_end, new_end = change.new_end))]
pub fn relex(tokens: &mut Vec<Token>, new_text: &str, change: TextChange, region: Span) -> Relexed {
    let delta = change.delta();
    let old_len = (new_text.len() as isize - delta).max(0) as usize;
    let anchor = region.start.min(change.start);

    let first = if anchor == 0 || tokens.is_empty() {
        0
    } else {
        let touching = tokens.partition_point(|t| t.span.end < anchor);
        touching.min(tokens.len() - 1).saturating_sub(1)
    };
    let from = tokens.get(first).map_or(0, |t| t.span.start);

    let resume_after = {
        let old_tail = region.end.max(change.old_end).min(old_len);
        change.new_end.max((old_tail as isize + delta).max(0) as usize)
    };

    let mut produced = Vec::new();
    let mut sync = tokens.len();
    let mut new_end = new_text.len();
    // Old tokens before `cursor` start before the position being examined.
    let mut cursor = first;
    for token in tokenize(new_text, from) {
        let start = token.span.start;
        if start >= resume_after {
            let old_start = (start as isize - delta) as usize;
            cursor += tokens[cursor..].partition_point(|t| t.span.start < old_start);
            if tokens.get(cursor).is_some_and(|t| t.span.start == old_start) {
                sync = cursor;
                new_end = start;
                break;
            }
        }
        produced.push(token);
    }

    let old_end = tokens.get(sync).map_or(old_len, |t| t.span.start);
    let result = Relexed {
        first,
        replaced: sync - first,
        produced: produced.len(),
        old: Span::new(from, old_end),
        new: Span::new(from, new_end),
    };

    tokens.splice(first..sync, produced);
    if delta != 0 {
        for token in &mut tokens[first + result.produced..] {
            token.span = token.span.shifted(delta);
        }
    }

    tracing::debug!(
        first = result.first,
        replaced = result.replaced,
        produced = result.produced,
        "relexed"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    fn edit(old: &str, start: usize, old_end: usize, insert: &str) -> (String, TextChange) {
        let mut new = String::with_capacity(old.len() + insert.len());
        new.push_str(&old[..start]);
        new.push_str(insert);
        new.push_str(&old[old_end..]);
        (new, TextChange::new(start, old_end, start + insert.len()))
    }

    fn relex_matches_full(old: &str, start: usize, old_end: usize, insert: &str) -> Relexed {
        let mut tokens = lex(old);
        let (new, change) = edit(old, start, old_end, insert);
        let relexed = relex(&mut tokens, &new, change, Span::new(start, old_end));
        assert_eq!(tokens, lex(&new), "edit {start}..{old_end} -> {insert:?} on {old:?}");
        relexed
    }

    #[test]
    fn test_delta() {
        assert_eq!(TextChange::new(4, 6, 9).delta(), 3);
        assert_eq!(TextChange::new(4, 9, 4).delta(), -5);
    }

    #[test]
    fn test_typing_extends_identifier() {
        let source = "let foo = 1;\nlet bar = 2;";
        let relexed = relex_matches_full(source, 7, 7, "d");
        assert!(relexed.produced <= 4);
        assert!(relexed.new.end < source.len());
    }

    #[test]
    fn test_suffix_is_shifted() {
        let source = "int a; int b; int c;";
        let mut tokens = lex(source);
        let (new, change) = edit(source, 4, 5, "alpha");
        relex(&mut tokens, &new, change, Span::new(4, 5));
        let last = tokens.last().unwrap();
        assert_eq!(last.span, Span::new(new.len() - 1, new.len()));
    }

    #[test]
    fn test_opening_a_block_comment_relexes_to_end() {
        let source = "a b\nc d\ne f";
        let relexed = relex_matches_full(source, 2, 2, "/*");
        assert_eq!(relexed.new.end, source.len() + 2);
    }

    #[test]
    fn test_closing_a_string_changes_following_tokens() {
        relex_matches_full("s = \"abc; t = 1;\nu", 8, 8, "\"");
        relex_matches_full("s = \"abc\"; t", 8, 9, "");
    }

    #[test]
    fn test_lookahead_into_edit_is_relexed() {
        // `1.` followed by a digit is one number; the previous tokens must be rescanned.
        relex_matches_full("x = 1.;", 6, 6, "5");
        relex_matches_full("a -b", 2, 2, "-");
        relex_matches_full("a /b", 2, 2, "/");
        relex_matches_full("a/ b", 2, 3, "");
    }

    #[test]
    fn test_edits_at_document_edges() {
        relex_matches_full("", 0, 0, "class A {}");
        relex_matches_full("class A {}", 0, 0, "// c\n");
        relex_matches_full("class A {}", 10, 10, " x");
        relex_matches_full("class A {}", 0, 10, "");
    }

    #[test]
    fn test_full_region_relexes_everything() {
        let source = "let a = 1;";
        let mut tokens = lex(source);
        let (new, change) = edit(source, 4, 5, "b");
        let relexed = relex(&mut tokens, &new, change, Span::new(0, source.len()));
        assert_eq!(tokens, lex(&new));
        assert_eq!(relexed.first, 0);
        assert_eq!(relexed.produced, tokens.len());
        assert_eq!(relexed.new, Span::new(0, new.len()));
    }

    #[test]
    fn test_region_wider_than_change_still_matches() {
        let source = "one two\nthree four\nfive";
        let mut tokens = lex(source);
        let (new, change) = edit(source, 9, 9, "x");
        let relexed = relex(&mut tokens, &new, change, Span::new(8, 18));
        assert_eq!(tokens, lex(&new));
        assert!(relexed.new.end >= 19);
    }

    #[test]
    fn test_multibyte_text() {
        relex_matches_full("a ✓ b", 2, 5, "é");
        relex_matches_full("\"✓\" x", 1, 1, "\\");
    }
}
