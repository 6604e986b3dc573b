//! Engine configuration
//!
//! Loaded from a JSON file by the CLI (`--config`) or from the LSP client's initialization options. Every field is
//! optional on the wire; missing fields take their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default upper bound on candidates returned per completion request.
pub const DEFAULT_MAX_CANDIDATES: usize = 50;

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    #[diagnostic(code(mu::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid engine configuration: {0}")]
    #[diagnostic(
        code(mu::config::json),
        help("expected an object with optional `maxCandidates`, `incremental`, `extraKeywords`, `extraTypes`")
    )]
    Json(#[from] serde_json::Error),
}

/// Completion engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct EngineConfig {
    /// Maximum number of candidates per completion request
    pub max_candidates: usize,
    /// Relex and rebuild only the region around an edit; `false` reprocesses the whole document every time
    pub incremental: bool,
    /// Additional words offered alongside the keyword table
    pub extra_keywords: Vec<String>,
    /// Additional type names offered alongside the builtin type table
    pub extra_types: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_candidates: DEFAULT_MAX_CANDIDATES,
            incremental: true,
            extra_keywords: Vec::new(),
            extra_types: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the candidate limit
    pub fn with_max_candidates(mut self, max: usize) -> Self {
        self.max_candidates = max;
        self
    }

    /// Enable or disable incremental reparsing
    pub fn with_incremental(mut self, incremental: bool) -> Self {
        self.incremental = incremental;
        self
    }

    /// Add extra keyword-like completions
    pub fn with_extra_keywords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_keywords.extend(words.into_iter().map(Into::into));
        self
    }

    /// Add extra type-name completions
    pub fn with_extra_types<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_types.extend(names.into_iter().map(Into::into));
        self
    }

    /// Parse a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Deserialize from an already-parsed JSON value (LSP initialization options).
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Read and parse a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}
