//! Request payloads and response records exchanged with the ledger.

use provenant_commit::ArtifactCommit;
use serde::{Deserialize, Serialize};

/// Body of the artifact creation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPayload {
    /// Artifact fingerprint.
    pub sha256: String,
    /// Artifact file name or image name.
    pub filename: String,
    /// Free-form description.
    pub description: String,
    /// Commit the artifact was built from.
    pub git_commit: String,
    /// Link to the CI build.
    pub build_url: String,
    /// Link to the commit in the source host.
    pub commit_url: String,
    /// HTTPS browsing URL of the repository.
    pub repo_url: String,
    /// Commits attributed to this artifact, newest first.
    pub commits_list: Vec<ArtifactCommit>,
}

/// Body of the changelog backfill request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackfillPayload {
    /// HTTPS browsing URL of the repository.
    pub repo_url: String,
    /// Commits attributed to the artifact, newest first.
    #[serde(rename = "git_commit_list")]
    pub commits_list: Vec<ArtifactCommit>,
}

/// Body of the approval request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalPayload {
    /// Fingerprint of the artifact to approve.
    pub artifact_sha256: String,
    /// Free-form description.
    pub description: String,
    /// Last commit already approved, excluded from the list.
    pub oldest_commit: String,
    /// Commit the approval runs up to.
    pub newest_commit: String,
    /// Hashes of the commits under review, newest first.
    pub src_commit_list: Vec<String>,
    /// HTTPS browsing URL of the repository.
    pub repo_url: String,
}

/// An artifact already recorded in a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArtifactSummary {
    /// Artifact fingerprint.
    pub sha256: String,
    /// Commit the artifact was built from.
    pub git_commit: String,
}

/// Entry of the artifact listing endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ArtifactRecord {
    pub evidence: ArtifactEvidence,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtifactEvidence {
    pub artifact: ArtifactSummary,
}

/// Response of the `latest_commit` endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct LatestCommitResponse {
    #[serde(default)]
    pub latest_commit: Option<String>,
}

/// Response of the `previous_commit` endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct PreviousCommitResponse {
    #[serde(default)]
    pub previous_commit: Option<String>,
}
