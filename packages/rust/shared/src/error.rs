//! Error types for Pagesmith.
//!
//! Library crates use [`PagesmithError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Pagesmith operations.
#[derive(Debug, thiserror::Error)]
pub enum PagesmithError {
    /// Configuration loading, secret resolution, or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while talking to an external API.
    #[error("network error: {0}")]
    Network(String),

    /// The generative API did not produce usable output.
    #[error("generation error: {0}")]
    Generation(String),

    /// Malformed persisted data (completed topics, API payloads).
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Content validation error (invalid HTML, index markers, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Chat notification failed.
    #[error("notification error: {0}")]
    Notification(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PagesmithError>;

impl PagesmithError {
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

    /// Create a generation error from any displayable message.
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
