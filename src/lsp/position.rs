//! Conversions from LSP positions to byte offsets
//!
//! LSP positions count columns in UTF-16 code units; the engine works in byte offsets.

use tower_lsp::lsp_types::{Position, Range};

/// Convert an LSP Position to a byte offset.
///
/// Lines past the end clamp to the end of the text, columns past the end of a line clamp to the line end, and a
/// column in the middle of a surrogate pair rounds down to the start of that character.
pub fn position_to_offset(source: &str, position: Position) -> usize {
    let mut line_start = 0;
    for _ in 0..position.line {
        match source[line_start..].find('\n') {
            Some(i) => line_start += i + 1,
            None => return source.len(),
        }
    }

    let mut col = 0u32;
    for (i, c) in source[line_start..].char_indices() {
        if c == '\n' || c == '\r' {
            return line_start + i;
        }
        let next = col + c.len_utf16() as u32;
        if next > position.character {
            return line_start + i;
        }
        col = next;
    }
    source.len()
}

/// Convert an LSP Range to a byte range, ordering the ends if the client sent them reversed
pub fn range_to_offsets(source: &str, range: Range) -> std::ops::Range<usize> {
    let start = position_to_offset(source, range.start);
    let end = position_to_offset(source, range.end);
    start.min(end)..start.max(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_to_offset() {
        let source = "line 1\nline 2\nline 3";
        assert_eq!(position_to_offset(source, Position::new(0, 0)), 0);
        assert_eq!(position_to_offset(source, Position::new(1, 0)), 7);
        assert_eq!(position_to_offset(source, Position::new(1, 3)), 10);
        assert_eq!(position_to_offset(source, Position::new(2, 6)), source.len());
    }

    #[test]
    fn test_utf16_columns() {
        // 'é' is 2 bytes and 1 UTF-16 unit; '𝄞' is 4 bytes and 2 units.
        let source = "é𝄞x";
        assert_eq!(position_to_offset(source, Position::new(0, 1)), 2);
        assert_eq!(position_to_offset(source, Position::new(0, 3)), 6);
        assert_eq!(position_to_offset(source, Position::new(0, 4)), 7);
        // Inside the surrogate pair
        assert_eq!(position_to_offset(source, Position::new(0, 2)), 2);
    }

    #[test]
    fn test_position_to_offset_clamps() {
        let source = "ab\r\ncd\nef";
        assert_eq!(position_to_offset(source, Position::new(0, 10)), 2);
        assert_eq!(position_to_offset(source, Position::new(1, 1)), 5);
        assert_eq!(position_to_offset(source, Position::new(2, 2)), source.len());
        assert_eq!(position_to_offset(source, Position::new(7, 0)), source.len());
    }

    #[test]
    fn test_range_to_offsets() {
        let source = "one\ntwo";
        let range = Range::new(Position::new(1, 1), Position::new(0, 1));
        assert_eq!(range_to_offsets(source, range), 1..5);
        let line = Range::new(Position::new(1, 0), Position::new(1, 3));
        assert_eq!(&source[range_to_offsets(source, line)], "two");
    }
}
