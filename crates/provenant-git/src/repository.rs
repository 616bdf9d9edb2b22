//! Git repository wrapper.

use std::path::Path;

use git2::{Commit, Oid, Repository as Git2Repo, Sort};
use provenant_commit::ArtifactCommit;
use tracing::debug;

use crate::{GitError, GitResult};

/// A read-only view over one local Git repository.
pub struct Repository {
    inner: Git2Repo,
}

impl Repository {
    /// Opens a repository at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a valid Git repository.
    pub fn open(path: impl AsRef<Path>) -> GitResult<Self> {
        let path = path.as_ref();
        let inner = Git2Repo::open(path)
            .map_err(|_| GitError::RepositoryUnavailable(path.to_path_buf()))?;
        Ok(Self { inner })
    }

    /// Returns the repository root path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.inner.workdir().unwrap_or_else(|| self.inner.path())
    }

    /// Resolves a revision expression to a commit id.
    ///
    /// Accepts full or abbreviated hashes, branch and tag names, and relative
    /// expressions such as `main~2` or `HEAD^`. Annotated tags are peeled to
    /// the commit they point at.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RevisionNotFound`] if the expression does not
    /// resolve to a commit.
    pub fn resolve_revision(&self, revision: &str) -> GitResult<Oid> {
        self.inner
            .revparse_single(revision)
            .and_then(|object| object.peel_to_commit())
            .map(|commit| commit.id())
            .map_err(|_| GitError::RevisionNotFound(revision.to_string()))
    }

    /// Returns the short name of the checked out branch.
    ///
    /// Returns `None` when HEAD is detached; callers should omit the branch
    /// rather than treat it as an error.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::NoHead`] if HEAD cannot be resolved.
    pub fn current_branch(&self) -> GitResult<Option<String>> {
        let head = self.inner.head().map_err(|_| GitError::NoHead)?;
        if head.is_branch() {
            Ok(head.shorthand().map(String::from))
        } else {
            Ok(None)
        }
    }

    /// Returns the commit a revision expression resolves to.
    ///
    /// # Errors
    ///
    /// Returns an error if the revision or HEAD cannot be resolved.
    pub fn commit(&self, revision: &str) -> GitResult<ArtifactCommit> {
        let branch = self.branch_label()?;
        let oid = self.resolve_revision(revision)?;
        let commit = self.inner.find_commit(oid)?;
        Ok(project(&commit, &branch))
    }

    /// Returns the commits after `oldest` up to and including `newest`.
    ///
    /// Commits are ordered newest first by commit time and include every
    /// parent of merge commits. `oldest` itself is never part of the result,
    /// so the result is empty when both resolve to the same commit.
    ///
    /// Every commit is labelled with the branch checked out *now*, even when
    /// it was authored on a branch that has since been merged.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::HistoryDiscontinuity`] if the walk runs out of
    /// commits without meeting `oldest`, which typically means history was
    /// rewritten since `oldest` was recorded.
    pub fn commits_between(&self, oldest: &str, newest: &str) -> GitResult<Vec<ArtifactCommit>> {
        let branch = self.branch_label()?;
        let newest_oid = self.resolve_revision(newest)?;
        let oldest_oid = self.resolve_revision(oldest)?;

        debug!(newest = %newest_oid, oldest = %oldest_oid, "walking commit range");

        let mut revwalk = self.inner.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk.push(newest_oid)?;

        let mut commits = Vec::new();
        for oid in revwalk {
            let oid = oid?;
            if oid == oldest_oid {
                return Ok(commits);
            }
            let commit = self.inner.find_commit(oid)?;
            commits.push(project(&commit, &branch));
        }

        Err(GitError::HistoryDiscontinuity {
            oldest: oldest_oid.to_string(),
            newest: newest_oid.to_string(),
        })
    }

    /// Returns every commit reachable from `newest`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the revision or HEAD cannot be resolved.
    pub fn history(&self, newest: &str) -> GitResult<Vec<ArtifactCommit>> {
        let branch = self.branch_label()?;
        let newest_oid = self.resolve_revision(newest)?;

        let mut revwalk = self.inner.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk.push(newest_oid)?;

        revwalk
            .map(|oid| -> GitResult<ArtifactCommit> {
                let commit = self.inner.find_commit(oid?)?;
                Ok(project(&commit, &branch))
            })
            .collect()
    }

    /// Returns the URL configured for the named remote, if any.
    #[must_use]
    pub fn remote_url(&self, name: &str) -> Option<String> {
        let remote = self.inner.find_remote(name).ok()?;
        remote.url().map(String::from)
    }

    fn branch_label(&self) -> GitResult<String> {
        Ok(self.current_branch()?.unwrap_or_default())
    }
}

/// Projects a git2 commit into an [`ArtifactCommit`].
fn project(commit: &Commit<'_>, branch: &str) -> ArtifactCommit {
    let author = commit.author();
    ArtifactCommit::new(
        commit.id().to_string(),
        commit.message().unwrap_or(""),
        ArtifactCommit::format_author(
            author.name().unwrap_or("Unknown"),
            author.email().unwrap_or(""),
        ),
        author.when().seconds(),
        branch,
        commit.parent_ids().map(|oid| oid.to_string()).collect(),
    )
}
