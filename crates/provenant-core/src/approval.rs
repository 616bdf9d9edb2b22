//! Approval requests.

use provenant_git::Repository;
use provenant_ledger::{ApprovalPayload, Ledger};
use tracing::info;

use crate::{CoreResult, ReportContext, repo_url};

/// An artifact and the commit range an approval should cover.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApprovalRequest {
    /// Pipeline the artifact belongs to.
    pub pipeline: String,
    /// SHA-256 of the artifact.
    pub fingerprint: String,
    pub description: String,
    /// Last commit already approved. Not part of the review.
    pub oldest_commit: String,
    /// Commit the review runs up to.
    pub newest_commit: String,
}

/// Requests an approval of an artifact for the commits after
/// `request.oldest_commit` up to `request.newest_commit`.
///
/// Unlike artifact reports, the range is chosen by the caller, so a range
/// that cannot be walked is an error rather than a truncated changelog.
///
/// # Errors
///
/// Returns an error if either commit does not resolve, if the oldest commit
/// is not an ancestor of the newest one, or if the ledger cannot be reached.
pub fn request_approval(
    ctx: &mut ReportContext,
    ledger: &dyn Ledger,
    repo: &Repository,
    request: &ApprovalRequest,
) -> CoreResult<ApprovalPayload> {
    let oldest = repo.resolve_revision(&request.oldest_commit)?.to_string();
    let newest = repo.resolve_revision(&request.newest_commit)?.to_string();

    let commits = repo.commits_between(&oldest, &newest)?;
    if commits.is_empty() {
        ctx.warn(format!(
            "no commits after {oldest} up to {newest}; the approval covers no changes"
        ));
    }

    let payload = ApprovalPayload {
        artifact_sha256: request.fingerprint.clone(),
        description: request.description.clone(),
        src_commit_list: commits.into_iter().map(|commit| commit.sha1).collect(),
        repo_url: repo_url(ctx, repo),
        oldest_commit: oldest,
        newest_commit: newest,
    };

    if ctx.dry_run {
        info!(
            "dry run, not requesting approval:\n{}",
            serde_json::to_string_pretty(&payload)?
        );
        return Ok(payload);
    }

    ledger.request_approval(&request.pipeline, &payload)?;
    info!(
        fingerprint = %payload.artifact_sha256,
        commits = payload.src_commit_list.len(),
        "requested approval"
    );
    Ok(payload)
}
