//! String scanning for the Mu tokenizer
//!
//! Handles double-quoted strings and single-quoted character literals. Both honour backslash escapes.
//!
//! ## Notes
//! - An unterminated literal ends before the next newline (or at end of input), so a missing quote damages at
//!   most one line of tokens while the user is typing.

use super::Lexer;
use super::tokens::TokenKind;

impl Lexer<'_> {
    /// Scan the rest of a literal whose opening `quote` was already consumed.
    pub(super) fn scan_string(&mut self, quote: char) -> TokenKind {
        while let Some(c) = self.peek() {
            match c {
                '\n' => break,
                '\\' => {
                    self.advance();
                    // An escaped newline does not continue the literal onto the next line.
                    if self.peek().is_some_and(|next| next != '\n') {
                        self.advance();
                    }
                }
                c if c == quote => {
                    self.advance();
                    break;
                }
                _ => {
                    self.advance();
                }
            }
        }
        TokenKind::String
    }
}
