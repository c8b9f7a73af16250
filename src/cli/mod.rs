//! CLI module for the Imp front end
//!
//! This module provides the command-line interface for the checker.
//!
//! ## Commands
//!
//! - `check <file>` - Run the full pipeline: tokens, parse tree, lint findings
//! - `tokens <file>` - Tokenize only
//! - `dfa` - Show the demo grammar's automaton and its determinization
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

/// The Imp language checker
#[derive(Parser, Debug)]
#[command(name = "imp")]
#[command(version = VERSION)]
#[command(about = "The Imp language checker", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// File to check (default action when no subcommand given)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Token patterns file (JSON), overriding the built-in table
    #[arg(long = "patterns", value_name = "FILE", global = true)]
    pub patterns: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full pipeline: tokens, parse tree, lint findings
    Check {
        /// Source file to check
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Tokenize only
    Tokens {
        /// Source file to tokenize
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Show the demo grammar's automaton and its determinization
    Dfa,
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
    let patterns = commands::load_patterns(cli.patterns.as_deref())?;

    match cli.command {
        Some(Command::Check { file }) => commands::check_file(&file.to_string_lossy(), patterns),
        Some(Command::Tokens { file }) => commands::tokens_file(&file.to_string_lossy(), patterns),
        Some(Command::Dfa) => commands::show_dfa(),
        None => {
            // Default: check the file if provided
            if let Some(file) = cli.file {
                commands::check_file(&file.to_string_lossy(), patterns)
            } else {
                // No command and no file - show help
                Err(CliError::new("", ExitCode::FAILURE))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::try_parse_from(["imp", "check", "test.imp"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Check { .. })));
    }

    #[test]
    fn test_cli_parse_tokens() {
        let cli = Cli::try_parse_from(["imp", "tokens", "test.imp"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Tokens { .. })));
    }

    #[test]
    fn test_cli_parse_dfa() {
        let cli = Cli::try_parse_from(["imp", "dfa"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Dfa)));
    }

    #[test]
    fn test_cli_parse_bare_file() {
        let cli = Cli::try_parse_from(["imp", "test.imp"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.file.is_some());
    }

    #[test]
    fn test_cli_parse_patterns_flag() {
        let cli =
            Cli::try_parse_from(["imp", "check", "test.imp", "--patterns", "p.json"]).unwrap();
        assert!(cli.patterns.is_some());
    }
}
