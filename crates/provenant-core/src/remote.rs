//! Repository URL reported with each artifact.

use provenant_git::{Repository, normalize_remote_url};
use tracing::debug;

use crate::ReportContext;

/// Returns the HTTPS browsing URL of the repository's configured remote.
///
/// A missing remote is common in CI checkouts and is not an error: a warning
/// is recorded and an empty URL is returned.
pub fn repo_url(ctx: &mut ReportContext, repo: &Repository) -> String {
    if let Some(url) = repo.remote_url(&ctx.remote) {
        let normalized = normalize_remote_url(&url);
        debug!(remote = %ctx.remote, url = %normalized, "resolved repository URL");
        return normalized;
    }

    let message = format!(
        "repo URL will not be reported since there is no remote ('{}') in git repository ({})",
        ctx.remote,
        repo.path().display()
    );
    ctx.warn(message);
    String::new()
}
