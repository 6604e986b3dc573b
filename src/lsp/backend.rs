//! LSP (Language Server Protocol) backend for Mu completion

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, RwLock};
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::config::EngineConfig;
use crate::engine::{self, CompletionCandidate, DocumentId, EngineResult, SymbolKind, Workspace};
use crate::lsp::position::{position_to_offset, range_to_offsets};

/// Mu Language Server
pub struct MuLanguageServer {
    client: Client,
    workspace: Arc<RwLock<Workspace>>,
    /// Generation of the newest completion request per document
    latest_request: Mutex<HashMap<DocumentId, u64>>,
    next_request: AtomicU64,
}

fn document_id(uri: &Url) -> DocumentId {
    DocumentId::new(uri.as_str())
}

/// Apply content changes in order, each against the text left by the one before.
fn apply_changes(
    workspace: &mut Workspace,
    id: &DocumentId,
    changes: Vec<TextDocumentContentChangeEvent>,
) -> EngineResult<()> {
    for change in changes {
        let snapshot = workspace.snapshot(id)?;
        let range = match change.range {
            Some(range) => range_to_offsets(snapshot.text(), range),
            None => 0..snapshot.text().len(),
        };
        workspace.on_edit(id, range, &change.text)?;
    }
    Ok(())
}

/// Build the response list. A full list is incomplete, so the client asks again as the prefix grows.
fn completion_list(candidates: Vec<CompletionCandidate>, limit: usize) -> CompletionList {
    let is_incomplete = limit > 0 && candidates.len() == limit;
    let items = candidates.into_iter().map(candidate_to_item).collect();
    CompletionList { is_incomplete, items }
}

/// Map an engine candidate to an LSP completion item. `sort_text` keeps the engine's order.
pub fn candidate_to_item(candidate: CompletionCandidate) -> CompletionItem {
    let kind = match candidate.kind {
        SymbolKind::Keyword => CompletionItemKind::KEYWORD,
        SymbolKind::Type => CompletionItemKind::CLASS,
        SymbolKind::Variable => CompletionItemKind::VARIABLE,
        SymbolKind::Function => CompletionItemKind::FUNCTION,
        SymbolKind::Namespace => CompletionItemKind::MODULE,
    };
    CompletionItem {
        detail: Some(candidate.kind.to_string()),
        sort_text: Some(format!("{:04}", candidate.sort_rank)),
        documentation: candidate.documentation.map(Documentation::String),
        kind: Some(kind),
        label: candidate.label,
        ..Default::default()
    }
}

impl MuLanguageServer {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            workspace: Arc::new(RwLock::new(Workspace::default())),
            latest_request: Mutex::new(HashMap::new()),
            next_request: AtomicU64::new(0),
        }
    }

    /// Register a new completion request for `id`, superseding any earlier one.
    async fn begin_request(&self, id: &DocumentId) -> u64 {
        let generation = self.next_request.fetch_add(1, Ordering::Relaxed) + 1;
        self.latest_request.lock().await.insert(id.clone(), generation);
        generation
    }

    /// Whether a result computed for `generation` against `version` may still be sent.
    async fn is_latest(&self, id: &DocumentId, generation: u64, version: u64) -> bool {
        let newest = self.latest_request.lock().await.get(id).copied();
        newest == Some(generation) && self.workspace.read().await.is_current(id, version)
    }

    async fn complete_at(&self, id: DocumentId, position: Position) -> Result<Option<CompletionResponse>> {
        let generation = self.begin_request(&id).await;

        let (snapshot, vocabulary, limit) = {
            let workspace = self.workspace.read().await;
            let Ok(snapshot) = workspace.snapshot(&id) else {
                tracing::debug!(%id, "completion for unknown document");
                return Ok(None);
            };
            (snapshot, workspace.vocabulary(), workspace.config().max_candidates)
        };
        let version = snapshot.version();
        let cursor = position_to_offset(snapshot.text(), position);

        let candidates =
            tokio::task::spawn_blocking(move || engine::complete(&snapshot, cursor, &vocabulary, limit))
                .await
                .map_err(|err| {
                    tracing::error!(%id, error = %err, "completion worker failed");
                    Error::internal_error()
                })?;

        if !self.is_latest(&id, generation, version).await {
            tracing::debug!(%id, generation, version, "discarding superseded completion");
            return Ok(None);
        }

        Ok(Some(CompletionResponse::List(completion_list(candidates, limit))))
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for MuLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        if let Some(options) = params.initialization_options {
            match EngineConfig::from_value(options) {
                Ok(config) => *self.workspace.write().await = Workspace::new(config),
                Err(err) => tracing::warn!(error = %err, "ignoring invalid initialization options"),
            }
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::INCREMENTAL)),
                completion_provider: Some(CompletionOptions::default()),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "mu-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client.log_message(MessageType::INFO, "Mu LSP initialized").await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let id = document_id(&params.text_document.uri);
        self.workspace.write().await.open(id, params.text_document.text);
    }

    /// A rejected change means the server's text no longer matches the client's, so the document is closed and
    /// completions answer `None` until the client opens it again.
    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let id = document_id(&params.text_document.uri);
        let mut workspace = self.workspace.write().await;

        if let Err(err) = apply_changes(&mut workspace, &id, params.content_changes) {
            tracing::error!(%id, error = %err, "rejected change, dropping document until it is reopened");
            if let Err(err) = workspace.close(&id) {
                tracing::debug!(%id, error = %err, "close for unopened document");
            }
            drop(workspace);
            self.latest_request.lock().await.remove(&id);
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let id = document_id(&params.text_document.uri);
        if let Err(err) = self.workspace.write().await.close(&id) {
            tracing::debug!(%id, error = %err, "close for unopened document");
        }
        self.latest_request.lock().await.remove(&id);
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let position = params.text_document_position;
        self.complete_at(document_id(&position.text_document.uri), position.position)
            .await
    }
}
