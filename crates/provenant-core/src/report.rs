//! Artifact reporting.

use provenant_git::Repository;
use provenant_ledger::{ArtifactPayload, Ledger};
use tracing::{debug, info};

use crate::{CoreResult, ReportContext, reconcile, repo_url};

/// What is being reported and where it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactRequest {
    /// Pipeline the artifact belongs to.
    pub pipeline: String,
    /// SHA-256 of the artifact.
    pub fingerprint: String,
    /// Name the artifact is reported under.
    pub filename: String,
    /// Revision the artifact was built from.
    pub git_commit: String,
    pub description: String,
    pub build_url: String,
    pub commit_url: String,
}

/// Reports an artifact and its changelog to the ledger.
///
/// The changelog runs from the commit of the latest artifact recorded in the
/// pipeline up to `request.git_commit`. With `ctx.dry_run` the payload is
/// logged instead of submitted. The payload is returned in both cases.
///
/// # Errors
///
/// Returns an error if the ledger cannot be reached, if the payload cannot
/// be serialized, or if `request.git_commit` does not resolve.
pub fn report_artifact(
    ctx: &mut ReportContext,
    ledger: &dyn Ledger,
    repo: &Repository,
    request: &ArtifactRequest,
) -> CoreResult<ArtifactPayload> {
    let previous = ledger.latest_commit(&request.pipeline, &request.fingerprint)?;
    debug!(
        fingerprint = %request.fingerprint,
        previous = previous.as_deref().unwrap_or(""),
        "fetched latest recorded commit"
    );

    let changelog = reconcile(ctx, repo, &request.git_commit, previous.as_deref())?;
    let repo_url = repo_url(ctx, repo);

    let git_commit = changelog
        .current()
        .map_or_else(|| request.git_commit.clone(), |c| c.sha1.clone());

    let payload = ArtifactPayload {
        sha256: request.fingerprint.clone(),
        filename: request.filename.clone(),
        description: request.description.clone(),
        git_commit,
        build_url: request.build_url.clone(),
        commit_url: request.commit_url.clone(),
        repo_url,
        commits_list: changelog.commits,
    };

    if ctx.dry_run {
        info!(
            "dry run, not submitting artifact:\n{}",
            serde_json::to_string_pretty(&payload)?
        );
        return Ok(payload);
    }

    ledger.submit_artifact(&request.pipeline, &payload)?;
    info!(
        filename = %payload.filename,
        fingerprint = %payload.sha256,
        commits = payload.commits_list.len(),
        "reported artifact"
    );
    Ok(payload)
}
