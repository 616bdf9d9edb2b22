//! Git error types.

use std::path::PathBuf;

use thiserror::Error;

/// Git-related errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// The path does not exist or is not a Git repository.
    #[error("failed to open git repository at {0}")]
    RepositoryUnavailable(PathBuf),

    /// A revision expression did not resolve to a commit.
    #[error("failed to resolve {0}")]
    RevisionNotFound(String),

    /// The oldest commit is not an ancestor of the newest one.
    #[error("{oldest} is not an ancestor of {newest}; git history may have been rewritten")]
    HistoryDiscontinuity {
        /// The commit the walk was expected to stop at.
        oldest: String,
        /// The commit the walk started from.
        newest: String,
    },

    /// HEAD cannot be resolved (e.g. no commits yet).
    #[error("failed to get the current HEAD of the git repository")]
    NoHead,

    /// Git2 error.
    #[error("git error: {0}")]
    Git2(#[from] git2::Error),
}

/// Result type for git operations.
pub type GitResult<T> = Result<T, GitError>;
