//! Text edits against a document.

use std::ops::Range;

use mu_syntax::lexer::TextChange;

use super::error::{EngineError, EngineResult};

/// Replace the bytes in `range` with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: Range<usize>,
    pub new_text: String,
}

impl TextEdit {
    pub fn new(range: Range<usize>, new_text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: new_text.into(),
        }
    }

    /// Insert `text` at `offset`.
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(offset..offset, text)
    }

    /// Delete the bytes in `range`.
    pub fn delete(range: Range<usize>) -> Self {
        Self::new(range, String::new())
    }

    /// Check the edit against the text it will be applied to.
    pub fn validate(&self, text: &str) -> EngineResult<()> {
        let Range { start, end } = self.range;
        if start > end || end > text.len() || !text.is_char_boundary(start) || !text.is_char_boundary(end) {
            return Err(EngineError::EditOutOfBounds {
                start,
                end,
                len: text.len(),
            });
        }
        Ok(())
    }

    /// The text the edit removes. Only meaningful after [`validate`](Self::validate) succeeded.
    pub fn removed<'t>(&self, text: &'t str) -> &'t str {
        &text[self.range.clone()]
    }

    /// Produce the post-edit text.
    pub fn apply(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() - self.range.len() + self.new_text.len());
        out.push_str(&text[..self.range.start]);
        out.push_str(&self.new_text);
        out.push_str(&text[self.range.end..]);
        out
    }

    /// The edit in the form the incremental relexer takes.
    pub fn change(&self) -> TextChange {
        TextChange::new(self.range.start, self.range.end, self.range.start + self.new_text.len())
    }
}
