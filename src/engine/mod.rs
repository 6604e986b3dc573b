//! Context-aware lexical completion engine
//!
//! ## Module Structure
//!
//! - `workspace` - The context object hosts talk to (`open`, `on_edit`, `complete`, ...)
//! - `document` - Per-document state and immutable snapshots
//! - `edit` - Text edits
//! - `scheduler` - Chooses how much of a document an edit forces to be reprocessed
//! - `scope` - Scope tree and symbol tracking
//! - `completion` - Candidate generation and ranking
//! - `vocabulary` - Keyword and type tables offered at every position
//! - `error` - Error taxonomy
//!
//! ## Examples
//! ```rust
//! use mu_complete::engine::{DocumentId, Workspace};
//!
//! let mut workspace = Workspace::default();
//! let id = DocumentId::from("scratch.mu");
//! workspace.open(id.clone(), "let frames = 24;\n");
//! workspace.on_edit(&id, 17..17, "fr").unwrap();
//!
//! let completion = workspace.complete(&id, 19).unwrap();
//! assert_eq!(completion.candidates[0].label, "frames");
//! ```

pub mod completion;
pub mod document;
pub mod edit;
pub mod error;
pub mod scheduler;
pub mod scope;
pub mod vocabulary;
pub mod workspace;

pub use completion::{CompletionCandidate, complete};
pub use document::{Document, DocumentId, DocumentSnapshot, EditOutcome};
pub use edit::TextEdit;
pub use error::{EngineError, EngineResult};
pub use scheduler::{ReparseKind, ReparseRegion, ReparseScheduler};
pub use scope::{ScopeId, ScopeKind, ScopeTracker, ScopeTree, Symbol, SymbolKind};
pub use vocabulary::Vocabulary;
pub use workspace::{Completion, Workspace};
