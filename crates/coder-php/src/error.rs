//! Error types for the PHP adapter
//!
//! Provides error handling for:
//! - Parse operations (source text → tree)
//! - Serialize operations (tree → source text)
//! - Run operations (file jobs, with the file path attached)

use coder_order::CoderError;
use coder_syntax::TreeError;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Errors during parsing (ingress)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Grammar could not be loaded
    #[error("parser initialization failed: {0}")]
    ParserInit(String),

    /// Parser gave up without producing a tree
    #[error("parse failed")]
    ParseFailed,

    /// Source does not parse cleanly
    #[error("syntax error at {line}:{column}: {message}")]
    SyntaxError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Code fragment is not exactly one expression
    #[error("not a single expression: '{0}'")]
    NotAnExpression(String),
}

impl ParseError {
    /// Syntax error at a zero-based row and column
    pub fn syntax_at(row: usize, column: usize, message: impl Into<String>) -> Self {
        Self::SyntaxError {
            line: row + 1,
            column: column + 1,
            message: message.into(),
        }
    }
}

/// Errors during printing (egress)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SerializeError {
    /// Tree access failed
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    /// Two edits touch the same source bytes
    #[error("overlapping edits at byte {0}")]
    OverlappingEdit(usize),

    /// Node span does not fit the source text
    #[error("span {start}..{end} is outside the source text")]
    SpanOutOfRange { start: usize, end: usize },
}

/// Errors while running jobs against files
#[derive(Debug, Clone, thiserror::Error)]
pub enum RunError {
    /// Reading or writing the file failed
    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    /// File does not parse
    #[error("cannot parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// Insertion failed
    #[error("cannot apply to {}: {source}", .path.display())]
    Apply {
        path: PathBuf,
        #[source]
        source: CoderError,
    },

    /// Printing failed
    #[error("cannot print {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: SerializeError,
    },
}

impl RunError {
    /// IO error for path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    /// Parse error for path
    pub fn parse(path: impl Into<PathBuf>, source: ParseError) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Insertion error for path
    pub fn apply(path: impl Into<PathBuf>, source: CoderError) -> Self {
        Self::Apply {
            path: path.into(),
            source,
        }
    }

    /// Printing error for path
    pub fn serialize(path: impl Into<PathBuf>, source: SerializeError) -> Self {
        Self::Serialize {
            path: path.into(),
            source,
        }
    }

    /// File the error is about
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            RunError::Io { path, .. }
            | RunError::Parse { path, .. }
            | RunError::Apply { path, .. }
            | RunError::Serialize { path, .. } => path,
        }
    }

    /// Insertion error, if that is what failed
    #[must_use]
    pub fn coder_error(&self) -> Option<&CoderError> {
        match self {
            RunError::Apply { source, .. } => Some(source),
            _ => None,
        }
    }
}
