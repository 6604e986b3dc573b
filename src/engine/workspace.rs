//! The engine's context object: open documents plus configuration.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

use crate::config::EngineConfig;

use super::completion::{self, CompletionCandidate};
use super::document::{Document, DocumentId, DocumentSnapshot, EditOutcome};
use super::edit::TextEdit;
use super::error::{EngineError, EngineResult};
use super::scheduler::ReparseScheduler;
use super::vocabulary::Vocabulary;

/// Candidates for one request, tagged with the document version they were computed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub version: u64,
    pub candidates: Vec<CompletionCandidate>,
}

/// All open documents and the configuration they are processed with.
///
/// Created explicitly by a host and dropped at shutdown. Documents are independent of each other.
#[derive(Debug)]
pub struct Workspace {
    config: EngineConfig,
    vocabulary: Arc<Vocabulary>,
    scheduler: ReparseScheduler,
    documents: HashMap<DocumentId, Document>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Workspace {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            vocabulary: Arc::new(Vocabulary::from_config(&config)),
            scheduler: ReparseScheduler::new(config.incremental),
            config,
            documents: HashMap::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Shared completion vocabulary, for computing completions away from the workspace.
    pub fn vocabulary(&self) -> Arc<Vocabulary> {
        Arc::clone(&self.vocabulary)
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.documents.contains_key(id)
    }

    fn document(&self, id: &DocumentId) -> EngineResult<&Document> {
        self.documents
            .get(id)
            .ok_or_else(|| EngineError::UnknownDocument(id.clone()))
    }

    /// Open (or reopen) a document, returning its version.
    pub fn open(&mut self, id: DocumentId, text: impl Into<String>) -> u64 {
        let document = Document::open(id.clone(), text);
        let version = document.version();
        self.documents.insert(id, document);
        version
    }

    /// Forget a document and everything derived from it.
    pub fn close(&mut self, id: &DocumentId) -> EngineResult<()> {
        self.documents
            .remove(id)
            .map(drop)
            .ok_or_else(|| EngineError::UnknownDocument(id.clone()))
    }

    /// Replace `range` with `new_text` and bring tokens and scopes up to date.
    pub fn on_edit(&mut self, id: &DocumentId, range: Range<usize>, new_text: &str) -> EngineResult<EditOutcome> {
        let document = self
            .documents
            .get_mut(id)
            .ok_or_else(|| EngineError::UnknownDocument(id.clone()))?;
        document.apply(&TextEdit::new(range, new_text), &self.scheduler)
    }

    /// Ranked candidates at byte offset `cursor`.
    pub fn complete(&self, id: &DocumentId, cursor: usize) -> EngineResult<Completion> {
        let snapshot = self.snapshot(id)?;
        let candidates = completion::complete(&snapshot, cursor, &self.vocabulary, self.config.max_candidates);
        Ok(Completion {
            version: snapshot.version(),
            candidates,
        })
    }

    pub fn snapshot(&self, id: &DocumentId) -> EngineResult<DocumentSnapshot> {
        Ok(self.document(id)?.snapshot())
    }

    pub fn version(&self, id: &DocumentId) -> EngineResult<u64> {
        Ok(self.document(id)?.version())
    }

    /// Whether `version` is still the document's latest. Closed or unknown documents have no current version.
    pub fn is_current(&self, id: &DocumentId, version: u64) -> bool {
        self.documents.get(id).is_some_and(|d| d.version() == version)
    }
}
