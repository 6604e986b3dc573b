//! Comment scanning for the Mu tokenizer

use super::Lexer;
use super::tokens::TokenKind;

impl Lexer<'_> {
    /// `// ...` up to, not including, the newline.
    pub(super) fn scan_line_comment(&mut self) -> TokenKind {
        self.eat_while(|c| c != '\n');
        TokenKind::Comment
    }

    /// `/* ... */`, possibly spanning lines. Unterminated comments run to end of input.
    pub(super) fn scan_block_comment(&mut self) -> TokenKind {
        // Opening `*`
        self.advance();
        while let Some(c) = self.advance() {
            if c == '*' && self.match_char('/') {
                break;
            }
        }
        TokenKind::Comment
    }
}

/// Strip comment markers from a comment token's text, for use as documentation.
///
/// ## Examples
/// ```rust
/// use mu_syntax::lexer::comment_body;
///
/// assert_eq!(comment_body("// Adds two numbers."), "Adds two numbers.");
/// assert_eq!(comment_body("/* Frame cache\n * size */"), "Frame cache\nsize");
/// ```
pub fn comment_body(text: &str) -> String {
    let body = if let Some(rest) = text.strip_prefix("/*") {
        rest.strip_suffix("*/").unwrap_or(rest)
    } else {
        text.trim_start_matches('/')
    };

    body.lines()
        .map(|line| line.trim().trim_start_matches('*').trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
