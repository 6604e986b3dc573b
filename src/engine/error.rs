//! Error taxonomy for the completion engine.
//!
//! Malformed Mu source is never an error: the tokenizer and scope tracker degrade instead. What remains are caller
//! mistakes.

use super::document::DocumentId;

/// Errors returned by [`Workspace`](super::Workspace) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum EngineError {
    #[error("unknown document `{0}`")]
    #[diagnostic(code(mu::engine::unknown_document), help("open the document before editing or querying it"))]
    UnknownDocument(DocumentId),

    #[error("edit range {start}..{end} is invalid for a document of {len} bytes")]
    #[diagnostic(
        code(mu::engine::edit_out_of_bounds),
        help("edit ranges must be ordered, lie within the document and fall on UTF-8 character boundaries")
    )]
    EditOutOfBounds { start: usize, end: usize, len: usize },
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
