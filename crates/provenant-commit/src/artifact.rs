//! Commit record as reported alongside an artifact.

use serde::{Deserialize, Serialize};

/// A commit projected into the shape the ledger expects.
///
/// The `branch` field is a snapshot taken when the commit was read, not an
/// intrinsic property of the commit. It is empty when the repository was in
/// a detached-HEAD state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactCommit {
    /// The full commit hash.
    pub sha1: String,

    /// The commit message, trimmed of surrounding whitespace.
    pub message: String,

    /// The author identity as `Name <email>`.
    pub author: String,

    /// Authored-at time in seconds since the Unix epoch (UTC).
    pub timestamp: i64,

    /// Branch checked out when the commit was read.
    pub branch: String,

    /// Parent hashes, in order. Empty for a root commit.
    pub parents: Vec<String>,
}

impl ArtifactCommit {
    /// Creates a new artifact commit.
    #[must_use]
    pub fn new(
        sha1: impl Into<String>,
        message: &str,
        author: impl Into<String>,
        timestamp: i64,
        branch: impl Into<String>,
        parents: Vec<String>,
    ) -> Self {
        Self {
            sha1: sha1.into(),
            message: message.trim().to_string(),
            author: author.into(),
            timestamp,
            branch: branch.into(),
            parents,
        }
    }

    /// Formats an author identity the way Git prints it.
    #[must_use]
    pub fn format_author(name: &str, email: &str) -> String {
        format!("{name} <{email}>")
    }
}
