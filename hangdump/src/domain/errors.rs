//! Structured error types for hangdump
//!
//! Using thiserror for automatic Display implementation and error chaining.

use thiserror::Error;

/// Failure while reconstructing threads from a transcript.
///
/// Any of these aborts the whole parse; no partial result is returned.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: malformed thread identifier in {text:?}")]
    MalformedThreadIdentifier { line: usize, text: String },

    #[error("line {line}: stack header has no preceding thread line")]
    MissingThreadLine { line: usize },
}

impl ParseError {
    /// 1-based transcript line the error was raised for
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            ParseError::MalformedThreadIdentifier { line, .. }
            | ParseError::MissingThreadLine { line } => *line,
        }
    }
}

/// Failure while writing the findings document.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
