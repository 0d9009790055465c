//! Error types for CourseGen.
//!
//! Library crates use [`CourseGenError`] via `thiserror`.
//! App crates (cli/tui) wrap this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all CourseGen operations.
#[derive(Debug, thiserror::Error)]
pub enum CourseGenError {
    /// Missing or rejected generation-service credential. Fatal: generation
    /// does not proceed.
    #[error("auth error: {0}")]
    Auth(String),

    /// Malformed or empty model response. Aborts the current generation
    /// request; the user should retry.
    #[error("generation error: {0}")]
    Generation(String),

    /// Web-search failure. Callers swallow this and degrade to "no
    /// enhancement" — it never aborts a generation request.
    #[error("search error: {0}")]
    Search(String),

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Content store write failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// No stored course document matches the identifier.
    #[error("course not found: {0}")]
    NotFound(String),

    /// A stored document is not valid against the expected schema.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (empty outline, bad field, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CourseGenError>;

impl CourseGenError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
