//! CLI module for the Mu completion engine
//!
//! This module provides the command-line interface, mostly useful for inspecting what the engine sees in a file.
//!
//! ## Commands
//!
//! - `tokens <file>` - Print the token stream
//! - `scopes <file>` - Print the scope outline
//! - `complete <file>` - Print ranked completions at a position
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    /// Bad arguments, matching clap's usage errors
    pub const USAGE: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Create a usage error (exit code 2).
    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::USAGE)
    }

    /// Render a diagnostic through miette as a failure.
    pub fn diagnostic<E>(err: E) -> Self
    where
        E: miette::Diagnostic + Send + Sync + 'static,
    {
        Self::failure(format!("{:?}", miette::Report::new(err)))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Context-aware completion for Mu source files
#[derive(Parser, Debug)]
#[command(name = "mu-complete")]
#[command(version = VERSION)]
#[command(about = "Context-aware completion for Mu source files", long_about = None)]
pub struct Cli {
    /// Engine configuration file (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the token stream of a file
    Tokens {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print the scope outline of a file
    Scopes {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print ranked completions at a position
    Complete {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Byte offset of the cursor
        #[arg(long, conflicts_with_all = ["line", "column"])]
        offset: Option<usize>,
        /// 1-based line of the cursor
        #[arg(long, requires = "column")]
        line: Option<usize>,
        /// 1-based column of the cursor, in characters
        #[arg(long, requires = "line")]
        column: Option<usize>,
        /// Maximum number of candidates (overrides the configuration)
        #[arg(long)]
        limit: Option<usize>,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Tokens { file } => commands::tokens(&file),
        Command::Scopes { file } => commands::scopes(&file, config),
        Command::Complete {
            file,
            offset,
            line,
            column,
            limit,
        } => {
            let position = match (offset, line, column) {
                (Some(offset), _, _) => commands::Cursor::Offset(offset),
                (None, Some(line), Some(column)) => commands::Cursor::LineColumn { line, column },
                _ => return Err(CliError::usage("Error: complete requires --offset or --line with --column")),
            };
            commands::complete(&file, config, position, limit)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
