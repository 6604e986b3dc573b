//! Tokenizer for the Mu language
//!
//! Handles tokenization including:
//! - Keywords and builtin type names (registry-backed)
//! - Identifiers, numbers, string and character literals
//! - Line (`//`) and block (`/* */`) comments
//! - Whitespace runs, kept as tokens so positions can always be recovered
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token, Span)
//! - `strings` - String/character literal scanning
//! - `comments` - Comment scanning
//! - `numbers` - Numeric literal scanning
//! - `incremental` - Relexing an edited region and splicing it into an existing token vector
//!
//! ## Notes
//! - The lexer carries no state between tokens: starting it at any token boundary produces exactly the
//!   remaining tokens of a full pass. The incremental relexer depends on this.
//! - Scanning looks at most two characters past the end of the token it is producing.

mod comments;
pub mod incremental;
mod numbers;
mod strings;
pub mod tokens;

use std::iter::FusedIterator;

pub use comments::comment_body;
pub use incremental::{Relexed, TextChange, relex};
pub use tokens::{Span, Token, TokenKind, classify_word};

/// Multi-character punctuation emitted as a single token.
const COMPOUND_PUNCTUATION: &[&str] = &[
    "->", "::", "==", "!=", "<=", ">=", "&&", "||", "++", "--", "+=", "-=", "*=", "/=", ":=",
];

// ============================================================================
// LEXER STATE
// ============================================================================

/// Lazy tokenizer over a Mu source text.
///
/// Iterating yields tokens in document order until the end of the text. The iterator is fused and never fails:
/// characters it does not recognize become single-character punctuation tokens.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a lexer positioned at the start of `source`.
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    /// Create a lexer positioned at byte `from`.
    ///
    /// Offsets past the end are clamped, and offsets inside a UTF-8 sequence move back to the start of that
    /// character. Callers wanting output identical to a full pass must pass a token boundary.
    pub fn starting_at(source: &'a str, from: usize) -> Self {
        let mut pos = from.min(source.len());
        while !source.is_char_boundary(pos) {
            pos -= 1;
        }
        Self { source, pos }
    }

    /// Byte offset of the next token.
    pub fn position(&self) -> usize {
        self.pos
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.pos..].chars();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.advance();
        }
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) -> Option<Token> {
        let start = self.pos;
        let c = self.advance()?;

        let kind = match c {
            c if c.is_whitespace() => {
                self.eat_while(char::is_whitespace);
                TokenKind::Whitespace
            }

            '/' if self.peek() == Some('/') => self.scan_line_comment(),
            '/' if self.peek() == Some('*') => self.scan_block_comment(),

            '"' | '\'' => self.scan_string(c),

            '0'..='9' => self.scan_number(c),

            c if is_ident_start(c) => {
                self.eat_while(is_ident_continue);
                classify_word(&self.source[start..self.pos])
            }

            _ => self.scan_punctuation(c),
        };

        Some(Token::new(kind, &self.source[start..self.pos], Span::new(start, self.pos)))
    }

    /// Try to extend a punctuation character into a compound, fallback to the single character.
    fn scan_punctuation(&mut self, first: char) -> TokenKind {
        if let Some(second) = self.peek() {
            let is_compound = COMPOUND_PUNCTUATION.iter().any(|p| {
                let mut chars = p.chars();
                chars.next() == Some(first) && chars.next() == Some(second)
            });
            if is_compound {
                self.advance();
            }
        }
        TokenKind::Punctuation
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.scan_token()
    }
}

impl FusedIterator for Lexer<'_> {}

// ============================================================================
// Helper functions
// ============================================================================

/// Check if a character can start an identifier (ASCII-only).
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Check if a character can continue an identifier (ASCII-only).
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Tokenize `source` lazily, starting at byte `from`.
///
/// `from` should be a token boundary (0 always is); see [`Lexer::starting_at`].
pub fn tokenize(source: &str, from: usize) -> Lexer<'_> {
    Lexer::starting_at(source, from)
}

/// Convenience function to lex a whole source string.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mu_core::lang::keywords::{self, KeywordId};
    use mu_core::lang::types::{self, BuiltinTypeId};

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source)
            .into_iter()
            .filter(|t| t.kind != TokenKind::Whitespace)
            .map(|t| t.kind)
            .collect()
    }

    fn texts(source: &str) -> Vec<String> {
        lex(source).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_keyword_registry_parity() {
        for k in keywords::KEYWORDS {
            let tokens = lex(k.item.canonical);
            assert_eq!(tokens.len(), 1, "expected a single token for {:?}", k.item.id);
            assert!(tokens[0].kind.is_keyword(k.item.id));
        }
    }

    #[test]
    fn test_type_registry_parity() {
        for t in types::BUILTIN_TYPES {
            let tokens = lex(t.canonical);
            assert_eq!(tokens.len(), 1, "expected a single token for {:?}", t.id);
            assert_eq!(tokens[0].kind, TokenKind::Type(t.id));
        }
    }

    #[test]
    fn test_declaration() {
        let ks = kinds("class Foo { function: bar (int; float x) {} }");
        assert_eq!(ks[0], TokenKind::Keyword(KeywordId::Class));
        assert_eq!(ks[1], TokenKind::Identifier);
        assert_eq!(ks[2], TokenKind::Punctuation);
        assert_eq!(ks[3], TokenKind::Keyword(KeywordId::Function));
        assert_eq!(ks[4], TokenKind::Punctuation);
        assert_eq!(ks[5], TokenKind::Identifier);
        assert_eq!(ks[7], TokenKind::Type(BuiltinTypeId::Int));
        assert_eq!(ks[9], TokenKind::Type(BuiltinTypeId::Float));
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_eq!(kinds("Class"), vec![TokenKind::Identifier]);
        assert_eq!(kinds("INT"), vec![TokenKind::Identifier]);
    }

    #[test]
    fn test_whitespace_and_comments_are_tokens() {
        let tokens = lex("a  // note\n/* block\n */ b");
        let ks: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            ks,
            vec![
                TokenKind::Identifier,
                TokenKind::Whitespace,
                TokenKind::Comment,
                TokenKind::Whitespace,
                TokenKind::Comment,
                TokenKind::Whitespace,
                TokenKind::Identifier,
            ]
        );
        assert_eq!(tokens[2].text, "// note");
        assert_eq!(tokens[4].text, "/* block\n */");
    }

    #[test]
    fn test_texts_reproduce_source() {
        let source = "module: m {\n  let s = \"hi \\\" there\"; // c\n  x += 0x1F * 2.5e-3f;\n} ✓ 'c'";
        assert_eq!(texts(source).concat(), source);
    }

    #[test]
    fn test_unrecognized_characters_become_punctuation() {
        let tokens = lex("a ✓ # b");
        assert_eq!(tokens[2].kind, TokenKind::Punctuation);
        assert_eq!(tokens[2].text, "✓");
        assert_eq!(tokens[4].kind, TokenKind::Punctuation);
        assert_eq!(tokens[4].text, "#");
    }

    #[test]
    fn test_unicode_letters_are_not_identifiers() {
        let tokens = lex("π");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Punctuation);
    }

    #[test]
    fn test_compound_punctuation() {
        assert_eq!(texts("a->b"), vec!["a", "->", "b"]);
        assert_eq!(texts("x:=1"), vec!["x", ":=", "1"]);
        assert_eq!(texts("a==b"), vec!["a", "==", "b"]);
        assert_eq!(texts("(){}"), vec!["(", ")", "{", "}"]);
    }

    #[test]
    fn test_unterminated_string_stops_at_line_end() {
        let tokens = lex("\"abc\nnext");
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text, "\"abc");
        assert_eq!(tokens[1].kind, TokenKind::Whitespace);
        assert_eq!(tokens[2].text, "next");
    }

    #[test]
    fn test_unterminated_string_at_eof() {
        let tokens = lex("let s = \"abc");
        let last = tokens.last().unwrap();
        assert_eq!(last.kind, TokenKind::String);
        assert_eq!(last.text, "\"abc");
    }

    #[test]
    fn test_unterminated_block_comment_runs_to_eof() {
        let tokens = lex("a /* never closed\n b {");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].kind, TokenKind::Comment);
        assert_eq!(tokens[2].span.end, "a /* never closed\n b {".len());
    }

    #[test]
    fn test_numbers() {
        assert_eq!(texts("42 3.14 0xFF 1e10 2.5f 7L"), vec![
            "42", " ", "3.14", " ", "0xFF", " ", "1e10", " ", "2.5f", " ", "7L"
        ]);
        assert_eq!(kinds("1.x"), vec![TokenKind::Number, TokenKind::Punctuation, TokenKind::Identifier]);
        assert_eq!(kinds("1e-5"), vec![TokenKind::Number]);
    }

    #[test]
    fn test_restart_from_token_boundary_matches_suffix() {
        let source = "class A { function: f (int; int a) { let x = \"s\"; } } // end";
        let full = lex(source);
        for (i, token) in full.iter().enumerate() {
            let restarted: Vec<Token> = tokenize(source, token.span.start).collect();
            assert_eq!(restarted, full[i..].to_vec(), "restart at {}", token.span.start);
        }
    }

    #[test]
    fn test_starting_inside_a_character_moves_back() {
        let source = "a✓b";
        let lexer = tokenize(source, 2);
        assert_eq!(lexer.position(), 1);
    }

    #[test]
    fn test_empty_source() {
        assert!(lex("").is_empty());
        assert_eq!(tokenize("abc", 99).next(), None);
    }
}
