//! Changelog backfill for artifacts recorded before changelogs were reported.

use std::io::Write;

use provenant_git::Repository;
use provenant_ledger::{BackfillPayload, Ledger};
use tracing::info;

use crate::{CoreError, CoreResult, ReportContext, reconcile, repo_url};

/// Recomputes and uploads the changelog of every artifact in a pipeline.
///
/// Artifacts whose commit is unknown to the local repository are skipped
/// with a warning. Progress is written to `out`. Returns the number of
/// artifacts backfilled.
///
/// # Errors
///
/// Returns an error if the ledger cannot be reached or `out` cannot be
/// written to.
pub fn backfill_pipeline(
    ctx: &mut ReportContext,
    ledger: &dyn Ledger,
    repo: &Repository,
    pipeline: &str,
    out: &mut dyn Write,
) -> CoreResult<usize> {
    let repo_url = repo_url(ctx, repo);
    let mut backfilled = 0;

    for page in 1.. {
        let artifacts = ledger.list_artifacts(pipeline, page)?;
        if artifacts.is_empty() {
            break;
        }

        for artifact in artifacts {
            writeln!(
                out,
                "Digest: {} -- git commit: {}",
                artifact.sha256, artifact.git_commit
            )?;

            let previous = ledger.previous_commit(pipeline, &artifact.sha256)?;
            if let Some(previous) = &previous {
                writeln!(out, "Previous commit: {previous}")?;
            }

            let changelog =
                match reconcile(ctx, repo, &artifact.git_commit, previous.as_deref()) {
                    Ok(changelog) => changelog,
                    Err(CoreError::Git(err)) => {
                        ctx.warn(format!("skipping artifact {}: {err}", artifact.sha256));
                        continue;
                    }
                    Err(err) => return Err(err),
                };

            for commit in &changelog.commits {
                writeln!(out, "\tCommit sha1: {}", commit.sha1)?;
            }

            let payload = BackfillPayload {
                repo_url: repo_url.clone(),
                commits_list: changelog.commits,
            };
            if ctx.dry_run {
                info!(
                    "dry run, not submitting backfill for {}:\n{}",
                    artifact.sha256,
                    serde_json::to_string_pretty(&payload)?
                );
            } else {
                ledger.submit_backfill(pipeline, &artifact.sha256, &payload)?;
            }
            backfilled += 1;
        }
    }

    info!(pipeline, backfilled, "backfill complete");
    Ok(backfilled)
}
