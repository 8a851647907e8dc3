//! Error types for Semagent.
//!
//! Library crates use [`SemagentError`] via `thiserror`.
//! The server binary wraps this with `color-eyre` for rich diagnostics.
//!
//! Each external dependency gets its own variant so callers can tell
//! "no data" (an `Ok` with an empty payload) apart from "service
//! unavailable" (an `Err` of the matching variant).

use std::path::PathBuf;

/// Top-level error type for all Semagent operations.
#[derive(Debug, thiserror::Error)]
pub enum SemagentError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Taxonomy file loading or parsing error.
    #[error("taxonomy error: {0}")]
    Taxonomy(String),

    /// SPARQL query error against the concept store.
    #[error("query error: {0}")]
    Query(String),

    /// Document-search service error (transport or API).
    #[error("search error: {0}")]
    Search(String),

    /// Completion service error (transport, API, or response shape).
    #[error("completion error: {0}")]
    Completion(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SemagentError>;

impl SemagentError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
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
