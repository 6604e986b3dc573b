//! Open documents and their immutable snapshots.

use std::fmt;
use std::sync::Arc;

use mu_syntax::lexer::{self, Relexed, Token};

use super::edit::TextEdit;
use super::error::EngineResult;
use super::scheduler::{ReparseKind, ReparseRegion, ReparseScheduler};
use super::scope::{ScopeTracker, ScopeTree};

/// Opaque document identity (an LSP URI, a file path, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of applying one edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOutcome {
    /// Document version after the edit
    pub version: u64,
    pub region: ReparseRegion,
    pub relexed: Relexed,
}

/// Immutable view of one document version. Cheap to clone and safe to send to another thread.
#[derive(Debug, Clone)]
pub struct DocumentSnapshot {
    version: u64,
    text: Arc<str>,
    tokens: Arc<Vec<Token>>,
    scopes: Arc<ScopeTree>,
}

impl DocumentSnapshot {
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }
}

/// An open document: text, tokens and scope tree, kept in sync edit by edit.
#[derive(Debug, Clone)]
pub struct Document {
    id: DocumentId,
    version: u64,
    text: Arc<str>,
    tokens: Arc<Vec<Token>>,
    scopes: Arc<ScopeTree>,
}

impl Document {
    /// Lex and scan a document from scratch. The first version is 0.
    #[tracing::instrument(skip_all, fields(id = %id))]
    pub fn open(id: DocumentId, text: impl Into<String>) -> Self {
        let text: Arc<str> = Arc::from(text.into());
        let tokens = lexer::lex(&text);
        let scopes = ScopeTracker::build(&tokens);
        Self {
            id,
            version: 0,
            text,
            tokens: Arc::new(tokens),
            scopes: Arc::new(scopes),
        }
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            version: self.version,
            text: Arc::clone(&self.text),
            tokens: Arc::clone(&self.tokens),
            scopes: Arc::clone(&self.scopes),
        }
    }

    /// Apply `edit`, relexing and rescanning as much as the scheduler requires.
    ///
    /// ## Errors
    /// - [`EngineError::EditOutOfBounds`](super::EngineError::EditOutOfBounds) if the range does not fit the text.
    #[tracing::instrument(skip_all, fields(id = %self.id, version = self.version))]
    pub fn apply(&mut self, edit: &TextEdit, scheduler: &ReparseScheduler) -> EngineResult<EditOutcome> {
        edit.validate(&self.text)?;

        let region = scheduler.on_edit(&self.text, Some(&self.scopes), edit);
        let text: Arc<str> = Arc::from(edit.apply(&self.text));
        let change = edit.change();

        // Copy-on-write: snapshots still holding the old tokens keep them.
        let tokens = Arc::make_mut(&mut self.tokens);
        let relexed = lexer::relex(tokens, &text, change, region.range);
        let scopes = match region.kind {
            ReparseKind::Full => ScopeTracker::build(tokens),
            ReparseKind::Line | ReparseKind::Paragraph => {
                ScopeTracker::update(&self.scopes, tokens, relexed.old, change.delta())
            }
        };

        self.text = text;
        self.scopes = Arc::new(scopes);
        self.version += 1;
        Ok(EditOutcome {
            version: self.version,
            region,
            relexed,
        })
    }
}
