//! Number scanning for the Mu tokenizer
//!
//! Numbers are lexed for their span only. Values are never parsed, so malformed literals (`0x`, `1e+`, `3.0q`)
//! still come out as a single `Number` token.

use super::Lexer;
use super::tokens::TokenKind;

impl Lexer<'_> {
    pub(super) fn scan_number(&mut self, first: char) -> TokenKind {
        if first == '0' && matches!(self.peek(), Some('x' | 'X')) {
            self.advance();
            self.eat_while(|c| c.is_ascii_hexdigit() || c == '_');
        } else {
            // Integer part
            self.eat_while(|c| c.is_ascii_digit() || c == '_');

            // Decimal part, only when a digit follows the dot
            if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
                self.eat_while(|c| c.is_ascii_digit() || c == '_');
            }

            // Exponent part
            if matches!(self.peek(), Some('e' | 'E'))
                && self.peek_next().is_some_and(|c| c.is_ascii_digit() || c == '+' || c == '-')
            {
                self.advance();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.advance();
                }
                self.eat_while(|c| c.is_ascii_digit());
            }
        }

        // Type suffixes (`f`, `L`, ...) and anything else glued onto the literal
        self.eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
        TokenKind::Number
    }
}
