//! Incremental reparse scheduling
//!
//! Decides how much of a document an edit forces the engine to reprocess. The decision only bounds the work: the
//! relexer and scope tracker widen it as far as needed to stay identical to a full reparse.

use mu_syntax::lexer::Span;

use super::edit::TextEdit;
use super::scope::ScopeTree;

/// How much of the document to reprocess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReparseKind {
    Full,
    Line,
    Paragraph,
}

/// The region an edit forces to be reprocessed, in pre-edit byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReparseRegion {
    pub kind: ReparseKind,
    pub range: Span,
}

impl ReparseRegion {
    pub fn full(len: usize) -> Self {
        Self {
            kind: ReparseKind::Full,
            range: Span::new(0, len),
        }
    }
}

/// Classifies edits into reparse regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReparseScheduler {
    incremental: bool,
}

impl Default for ReparseScheduler {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ReparseScheduler {
    pub fn new(incremental: bool) -> Self {
        Self { incremental }
    }

    /// Choose the region for `edit` against the pre-edit `text`.
    ///
    /// `scopes` is `None` when the document has never been parsed.
    pub fn on_edit(&self, text: &str, scopes: Option<&ScopeTree>, edit: &TextEdit) -> ReparseRegion {
        let Some(scopes) = scopes else {
            return ReparseRegion::full(text.len());
        };
        let removed = edit.removed(text);
        let inserted = edit.new_text.as_str();

        let region = if !self.incremental || is_structural(removed) || is_structural(inserted) {
            ReparseRegion::full(text.len())
        } else if !spans_lines(removed) && !spans_lines(inserted) && !has_quote(removed) && !has_quote(inserted) {
            ReparseRegion {
                kind: ReparseKind::Line,
                range: Span::new(line_start(text, edit.range.start), line_end(text, edit.range.end)),
            }
        } else {
            ReparseRegion {
                kind: ReparseKind::Paragraph,
                range: paragraph(text, scopes, edit.range.start, edit.range.end),
            }
        };

        tracing::debug!(kind = ?region.kind, start = region.range.start, end = region.range.end, "reparse scheduled");
        region
    }
}

fn is_structural(text: &str) -> bool {
    text.contains(['{', '}'])
}

fn spans_lines(text: &str) -> bool {
    text.contains('\n')
}

fn has_quote(text: &str) -> bool {
    text.contains(['"', '\''])
}

fn line_start(text: &str, offset: usize) -> usize {
    text[..offset].rfind('\n').map_or(0, |i| i + 1)
}

fn line_end(text: &str, offset: usize) -> usize {
    text[offset..].find('\n').map_or(text.len(), |i| offset + i)
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Expand `[start, end)` outward to the nearest blank line or top-level scope boundary on each side.
fn paragraph(text: &str, scopes: &ScopeTree, start: usize, end: usize) -> Span {
    let mut first = line_start(text, start);
    while first > 0 {
        let previous = line_start(text, first - 1);
        if is_blank(&text[previous..first - 1]) {
            break;
        }
        first = previous;
    }

    let mut last = line_end(text, end);
    while last < text.len() {
        let next_end = line_end(text, last + 1);
        if is_blank(&text[last + 1..next_end]) {
            last += 1;
            break;
        }
        last = next_end;
    }

    let boundaries = scopes
        .get(scopes.root())
        .map(|root| root.children())
        .unwrap_or_default()
        .iter()
        .filter_map(|&id| scopes.get(id))
        .flat_map(|entry| [entry.span().start, entry.span().end]);
    for boundary in boundaries {
        if boundary <= start {
            first = first.max(boundary);
        }
        if boundary >= end {
            last = last.min(boundary);
        }
    }

    Span::new(first, last)
}
