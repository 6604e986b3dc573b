//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::Path;

use crate::config::EngineConfig;
use crate::engine::{DocumentId, Workspace};
use mu_syntax::lexer;

use super::{CliError, CliResult, ExitCode};

/// Maximum source file size (16 MB).
///
/// The engine keeps the whole document, its tokens and scopes in memory.
const MAX_SOURCE_SIZE: u64 = 16 * 1024 * 1024;

/// Where to complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    /// Byte offset
    Offset(usize),
    /// 1-based line and character column
    LineColumn { line: usize, column: usize },
}

impl Cursor {
    /// Resolve to a byte offset in `source`, clamping past-the-end lines and columns.
    pub fn to_offset(self, source: &str) -> usize {
        match self {
            Cursor::Offset(offset) => offset,
            Cursor::LineColumn { line, column } => {
                let mut line_start = 0;
                for _ in 1..line.max(1) {
                    match source[line_start..].find('\n') {
                        Some(i) => line_start += i + 1,
                        None => return source.len(),
                    }
                }
                let line_text = source[line_start..].split('\n').next().unwrap_or_default();
                let within = line_text
                    .char_indices()
                    .nth(column.saturating_sub(1))
                    .map_or(line_text.len(), |(i, _)| i);
                line_start + within
            }
        }
    }
}

/// Read source file with size limit check.
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_SOURCE_SIZE` (16 MB)
pub fn read_source(file_path: &Path) -> CliResult<String> {
    let shown = file_path.display();
    let metadata =
        fs::metadata(file_path).map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", shown, e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            shown,
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(file_path).map_err(|e| CliError::failure(format!("Error reading file '{}': {}", shown, e)))
}

/// Load the engine configuration, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> CliResult<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_file(path).map_err(CliError::diagnostic),
        None => Ok(EngineConfig::default()),
    }
}

fn open(file_path: &Path, config: EngineConfig) -> CliResult<(Workspace, DocumentId)> {
    let source = read_source(file_path)?;
    let id = DocumentId::new(file_path.display().to_string());
    let mut workspace = Workspace::new(config);
    workspace.open(id.clone(), source);
    Ok((workspace, id))
}

/// Tokenize and display tokens.
pub fn tokens(file_path: &Path) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    for tok in lexer::lex(&source) {
        println!("{}..{}\t{:?}\t{:?}", tok.span.start, tok.span.end, tok.kind, tok.text);
    }
    Ok(ExitCode::SUCCESS)
}

/// Display the scope outline.
pub fn scopes(file_path: &Path, config: EngineConfig) -> CliResult<ExitCode> {
    let (workspace, id) = open(file_path, config)?;
    let snapshot = workspace.snapshot(&id).map_err(CliError::diagnostic)?;
    print!("{}", snapshot.scopes().render());
    Ok(ExitCode::SUCCESS)
}

/// Display ranked completions at `cursor`.
pub fn complete(file_path: &Path, config: EngineConfig, cursor: Cursor, limit: Option<usize>) -> CliResult<ExitCode> {
    let config = match limit {
        Some(limit) => config.with_max_candidates(limit),
        None => config,
    };
    let (workspace, id) = open(file_path, config)?;
    let snapshot = workspace.snapshot(&id).map_err(CliError::diagnostic)?;
    let offset = cursor.to_offset(snapshot.text());

    let completion = workspace.complete(&id, offset).map_err(CliError::diagnostic)?;
    for candidate in &completion.candidates {
        match &candidate.documentation {
            Some(doc) => println!("{}\t{}\t{}\t{}", candidate.sort_rank, candidate.label, candidate.kind, doc),
            None => println!("{}\t{}\t{}", candidate.sort_rank, candidate.label, candidate.kind),
        }
    }
    Ok(ExitCode::SUCCESS)
}
