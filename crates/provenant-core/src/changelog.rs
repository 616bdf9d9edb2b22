//! Changelog reconciliation.
//!
//! Reconciles the commit the ledger last recorded for an artifact with the
//! local commit graph. Rewritten or missing history never blocks a report:
//! the changelog degrades to the single commit that produced the artifact.

use provenant_commit::ArtifactCommit;
use provenant_config::HistoryCutoff;
use provenant_git::Repository;
use tracing::{debug, info};

use crate::{CoreResult, ReportContext};

/// Commits attributed to one artifact report, newest first.
///
/// Never empty: at minimum it holds the commit the artifact was built from.
/// Branch labels reflect the branch checked out while the changelog was
/// computed, not the branch each commit was authored on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changelog {
    /// The commits, newest first.
    pub commits: Vec<ArtifactCommit>,

    /// Set when the full range could not be computed and only the current
    /// commit was kept.
    pub truncated: bool,
}

impl Changelog {
    fn single(commit: ArtifactCommit, truncated: bool) -> Self {
        Self {
            commits: vec![commit],
            truncated,
        }
    }

    /// Returns the commit the artifact was built from.
    #[must_use]
    pub fn current(&self) -> Option<&ArtifactCommit> {
        self.commits.first()
    }

    /// Returns the number of commits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commits.len()
    }

    /// Returns true if there are no commits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

/// Computes the changelog of an artifact built from `current`.
///
/// With a `previous` commit, returns the commits after it up to `current`.
/// If that range cannot be computed (unknown commit, rewritten history), a
/// warning is recorded in `ctx` and only `current` is returned. Without a
/// `previous` commit, `ctx.cutoff` decides between `current` alone and its
/// whole history.
///
/// # Errors
///
/// Returns an error only if `current` itself cannot be resolved or read.
pub fn reconcile(
    ctx: &mut ReportContext,
    repo: &Repository,
    current: &str,
    previous: Option<&str>,
) -> CoreResult<Changelog> {
    let current_oid = repo.resolve_revision(current)?;
    debug!(current, oid = %current_oid, "resolved current commit");

    let previous = previous.map(str::trim).filter(|p| !p.is_empty());

    let Some(previous) = previous else {
        return match ctx.cutoff {
            HistoryCutoff::CurrentCommit => {
                info!("no previous artifact recorded, reporting the current commit only");
                Ok(Changelog::single(repo.commit(current)?, false))
            }
            HistoryCutoff::FullHistory => {
                info!("no previous artifact recorded, reporting the full history");
                Ok(Changelog {
                    commits: repo.history(current)?,
                    truncated: false,
                })
            }
        };
    };

    match repo.commits_between(previous, current) {
        Ok(commits) if !commits.is_empty() => {
            info!(count = commits.len(), previous, "collected changelog");
            Ok(Changelog {
                commits,
                truncated: false,
            })
        }
        Ok(_) => {
            debug!(previous, "artifact rebuilt from the previously recorded commit");
            Ok(Changelog::single(repo.commit(current)?, false))
        }
        Err(err) => {
            ctx.warn(format!(
                "{err}; the changelog only contains the current commit"
            ));
            Ok(Changelog::single(repo.commit(current)?, true))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestRepo;

    fn shas(changelog: &Changelog) -> Vec<String> {
        changelog.commits.iter().map(|c| c.sha1.clone()).collect()
    }

    #[test]
    fn test_delta_since_previous() {
        let mut fixture = TestRepo::new();
        let _a = fixture.commit("A");
        let b = fixture.commit("B");
        let c = fixture.commit("C");
        let repo = fixture.open();
        let mut ctx = ReportContext::default();

        let changelog = reconcile(&mut ctx, &repo, "HEAD", Some(&b.to_string())).unwrap();

        assert_eq!(shas(&changelog), vec![c.to_string()]);
        assert!(!changelog.truncated);
        assert!(ctx.warnings().is_empty());
    }

    #[test]
    fn test_range_excludes_previous() {
        let mut fixture = TestRepo::new();
        let a = fixture.commit("A");
        let b = fixture.commit("B");
        let c = fixture.commit("C");
        let repo = fixture.open();
        let mut ctx = ReportContext::default();

        let changelog = reconcile(&mut ctx, &repo, "HEAD", Some(&a.to_string())).unwrap();

        assert_eq!(shas(&changelog), vec![c.to_string(), b.to_string()]);
        assert_eq!(changelog.current().unwrap().sha1, c.to_string());
        assert_eq!(changelog.commits[1].parents, vec![a.to_string()]);
    }

    #[test]
    fn test_no_previous_reports_current_commit() {
        let mut fixture = TestRepo::new();
        fixture.commit("A");
        fixture.commit("B");
        let c = fixture.commit("C");
        let repo = fixture.open();
        let mut ctx = ReportContext::default();

        let changelog = reconcile(&mut ctx, &repo, "HEAD", None).unwrap();

        assert_eq!(shas(&changelog), vec![c.to_string()]);
        assert!(!changelog.truncated);
        assert!(ctx.warnings().is_empty());
    }

    #[test]
    fn test_blank_previous_is_no_previous() {
        let mut fixture = TestRepo::new();
        fixture.commit("A");
        let b = fixture.commit("B");
        let repo = fixture.open();
        let mut ctx = ReportContext::default();

        let changelog = reconcile(&mut ctx, &repo, "HEAD", Some("  ")).unwrap();

        assert_eq!(shas(&changelog), vec![b.to_string()]);
        assert!(ctx.warnings().is_empty());
    }

    #[test]
    fn test_no_previous_full_history() {
        let mut fixture = TestRepo::new();
        let a = fixture.commit("A");
        let b = fixture.commit("B");
        let c = fixture.commit("C");
        let repo = fixture.open();
        let mut ctx = ReportContext::default().cutoff(HistoryCutoff::FullHistory);

        let changelog = reconcile(&mut ctx, &repo, "HEAD", None).unwrap();

        assert_eq!(
            shas(&changelog),
            vec![c.to_string(), b.to_string(), a.to_string()]
        );
    }

    #[test]
    fn test_previous_equals_current() {
        let mut fixture = TestRepo::new();
        fixture.commit("A");
        let b = fixture.commit("B");
        let repo = fixture.open();
        let mut ctx = ReportContext::default();

        let changelog = reconcile(&mut ctx, &repo, "HEAD", Some(&b.to_string())).unwrap();

        assert_eq!(shas(&changelog), vec![b.to_string()]);
        assert!(!changelog.truncated);
        assert!(ctx.warnings().is_empty());
    }

    #[test]
    fn test_rewritten_history_falls_back() {
        let mut fixture = TestRepo::new();
        let a = fixture.commit("A");
        let b = fixture.commit("B");
        // Force-push: main now points at a sibling of B.
        fixture.reset_main(a);
        let rewritten = fixture.commit("B rewritten");
        let repo = fixture.open();
        let mut ctx = ReportContext::default();

        // B is still in the object store but no longer an ancestor of HEAD.
        let changelog = reconcile(&mut ctx, &repo, "HEAD", Some(&b.to_string())).unwrap();

        assert_eq!(shas(&changelog), vec![rewritten.to_string()]);
        assert!(changelog.truncated);
        assert_eq!(ctx.warnings().len(), 1);
        assert!(ctx.warnings()[0].contains("not an ancestor"));
    }

    #[test]
    fn test_unknown_previous_falls_back() {
        let mut fixture = TestRepo::new();
        fixture.commit("A");
        let b = fixture.commit("B");
        let repo = fixture.open();
        let mut ctx = ReportContext::default();

        let changelog = reconcile(
            &mut ctx,
            &repo,
            "HEAD",
            Some("1111111111111111111111111111111111111111"),
        )
        .unwrap();

        assert_eq!(shas(&changelog), vec![b.to_string()]);
        assert!(changelog.truncated);
        insta::assert_snapshot!(
            ctx.warnings()[0].as_str(),
            @"failed to resolve 1111111111111111111111111111111111111111; the changelog only contains the current commit"
        );
    }

    #[test]
    fn test_unknown_current_is_an_error() {
        let mut fixture = TestRepo::new();
        let a = fixture.commit("A");
        let repo = fixture.open();
        let mut ctx = ReportContext::default();

        let result = reconcile(&mut ctx, &repo, "no-such-branch", Some(&a.to_string()));
        assert!(result.is_err());
        assert!(ctx.warnings().is_empty());
    }

    #[test]
    fn test_merge_range() {
        let mut fixture = TestRepo::new();
        let a = fixture.commit("A");
        let b = fixture.commit("B");
        let side = fixture.commit_with("side", &[a], false);
        let merge = fixture.commit_with("merge", &[b, side], true);
        let repo = fixture.open();
        let mut ctx = ReportContext::default();

        let changelog = reconcile(&mut ctx, &repo, "HEAD", Some(&a.to_string())).unwrap();

        assert_eq!(
            shas(&changelog),
            vec![merge.to_string(), side.to_string(), b.to_string()]
        );
    }

    #[test]
    fn test_detached_head_has_empty_branch() {
        let mut fixture = TestRepo::new();
        let a = fixture.commit("A");
        let b = fixture.commit("B");
        fixture.git.set_head_detached(b).unwrap();
        let repo = fixture.open();
        let mut ctx = ReportContext::default();

        let changelog = reconcile(&mut ctx, &repo, "HEAD", Some(&a.to_string())).unwrap();

        assert_eq!(changelog.len(), 1);
        assert_eq!(changelog.commits[0].branch, "");
    }

    #[test]
    fn test_named_branch_label() {
        let mut fixture = TestRepo::new();
        fixture.commit("A");
        let repo = fixture.open();
        let mut ctx = ReportContext::default();

        let changelog = reconcile(&mut ctx, &repo, "HEAD", None).unwrap();
        assert_eq!(changelog.commits[0].branch, "main");
    }
}
