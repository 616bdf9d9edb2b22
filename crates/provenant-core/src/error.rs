//! Core error types.

use std::path::PathBuf;

use thiserror::Error;

/// Core-related errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Git error.
    #[error("git error: {0}")]
    Git(#[from] provenant_git::GitError),

    /// The ledger could not be reached or rejected a request.
    #[error("ledger unreachable: {0}")]
    LedgerUnreachable(#[from] provenant_ledger::LedgerError),

    /// The artifact path cannot be fingerprinted.
    #[error("cannot fingerprint {path}: {reason}")]
    Fingerprint { path: PathBuf, reason: String },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
