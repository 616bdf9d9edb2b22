//! Repository and ledger fixtures shared by the unit tests.

use std::cell::{Cell, RefCell};

use git2::{Commit, Oid, RepositoryInitOptions, Signature, Time};
use provenant_git::Repository;
use provenant_ledger::client::ARTIFACTS_PER_PAGE;
use provenant_ledger::{
    ApprovalPayload, ArtifactPayload, ArtifactSummary, BackfillPayload, Ledger, LedgerError,
    LedgerResult,
};
use tempfile::TempDir;

/// A throwaway repository with `main` as its initial branch.
pub struct TestRepo {
    pub dir: TempDir,
    pub git: git2::Repository,
    clock: i64,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("main");
        let git = git2::Repository::init_opts(dir.path(), &opts).unwrap();
        Self {
            dir,
            git,
            clock: 1_700_000_000,
        }
    }

    /// Opens the repository the way production code does.
    pub fn open(&self) -> Repository {
        Repository::open(self.dir.path()).unwrap()
    }

    /// Commits on top of HEAD and moves HEAD.
    pub fn commit(&mut self, message: &str) -> Oid {
        let parent = self
            .git
            .head()
            .ok()
            .and_then(|head| head.target());
        let parents: Vec<Oid> = parent.into_iter().collect();
        self.commit_with(message, &parents, true)
    }

    /// Commits with explicit parents, optionally moving HEAD.
    pub fn commit_with(&mut self, message: &str, parents: &[Oid], update_head: bool) -> Oid {
        self.clock += 60;
        let sig =
            Signature::new("Test User", "test@example.com", &Time::new(self.clock, 0)).unwrap();
        let tree_id = self.git.index().unwrap().write_tree().unwrap();
        let tree = self.git.find_tree(tree_id).unwrap();
        let parents: Vec<Commit<'_>> = parents
            .iter()
            .map(|oid| self.git.find_commit(*oid).unwrap())
            .collect();
        let parent_refs: Vec<&Commit<'_>> = parents.iter().collect();

        let update_ref = if update_head { Some("HEAD") } else { None };
        self.git
            .commit(update_ref, &sig, &sig, message, &tree, &parent_refs)
            .unwrap()
    }

    /// Points `main` at `oid`, as a force-push would.
    pub fn reset_main(&self, oid: Oid) {
        self.git
            .reference("refs/heads/main", oid, true, "force push")
            .unwrap();
    }

    pub fn add_remote(&self, name: &str, url: &str) {
        self.git.remote(name, url).unwrap();
    }
}

/// In-memory ledger holding the artifacts of a single pipeline.
///
/// `latest_commit` answers like the service: the commit of the newest
/// artifact other than the one being reported.
#[derive(Default)]
pub struct MemoryLedger {
    /// Recorded artifacts, oldest first.
    pub artifacts: RefCell<Vec<ArtifactPayload>>,
    pub backfills: RefCell<Vec<(String, BackfillPayload)>>,
    pub approvals: RefCell<Vec<ApprovalPayload>>,
    pub submissions: Cell<usize>,
    pub offline: Cell<bool>,
}

impl MemoryLedger {
    /// Seeds an artifact as if it had been reported earlier.
    pub fn record(&self, sha256: &str, git_commit: &str) {
        self.artifacts.borrow_mut().push(ArtifactPayload {
            sha256: sha256.to_string(),
            git_commit: git_commit.to_string(),
            ..ArtifactPayload::default()
        });
    }

    fn check(&self) -> LedgerResult<()> {
        if self.offline.get() {
            return Err(LedgerError::Status {
                method: "GET".to_string(),
                url: "memory://ledger".to_string(),
                status: 503,
                body: "offline".to_string(),
            });
        }
        Ok(())
    }
}

impl Ledger for MemoryLedger {
    fn latest_commit(&self, _pipeline: &str, fingerprint: &str) -> LedgerResult<Option<String>> {
        self.check()?;
        Ok(self
            .artifacts
            .borrow()
            .iter()
            .rev()
            .find(|a| a.sha256 != fingerprint)
            .map(|a| a.git_commit.clone()))
    }

    fn previous_commit(&self, _pipeline: &str, fingerprint: &str) -> LedgerResult<Option<String>> {
        self.check()?;
        let artifacts = self.artifacts.borrow();
        let position = artifacts.iter().position(|a| a.sha256 == fingerprint);
        Ok(position
            .and_then(|i| i.checked_sub(1))
            .map(|i| artifacts[i].git_commit.clone()))
    }

    fn submit_artifact(&self, _pipeline: &str, payload: &ArtifactPayload) -> LedgerResult<()> {
        self.check()?;
        self.submissions.set(self.submissions.get() + 1);
        let mut artifacts = self.artifacts.borrow_mut();
        match artifacts.iter_mut().find(|a| a.sha256 == payload.sha256) {
            Some(existing) => *existing = payload.clone(),
            None => artifacts.push(payload.clone()),
        }
        Ok(())
    }

    fn list_artifacts(&self, _pipeline: &str, page: u32) -> LedgerResult<Vec<ArtifactSummary>> {
        self.check()?;
        let per_page = ARTIFACTS_PER_PAGE as usize;
        let skip = (page.saturating_sub(1) as usize) * per_page;
        Ok(self
            .artifacts
            .borrow()
            .iter()
            .rev()
            .skip(skip)
            .take(per_page)
            .map(|a| ArtifactSummary {
                sha256: a.sha256.clone(),
                git_commit: a.git_commit.clone(),
            })
            .collect())
    }

    fn submit_backfill(
        &self,
        _pipeline: &str,
        fingerprint: &str,
        payload: &BackfillPayload,
    ) -> LedgerResult<()> {
        self.check()?;
        self.backfills
            .borrow_mut()
            .push((fingerprint.to_string(), payload.clone()));
        Ok(())
    }

    fn request_approval(&self, _pipeline: &str, payload: &ApprovalPayload) -> LedgerResult<()> {
        self.check()?;
        self.approvals.borrow_mut().push(payload.clone());
        Ok(())
    }

    fn ready(&self) -> LedgerResult<()> {
        self.check()
    }
}
