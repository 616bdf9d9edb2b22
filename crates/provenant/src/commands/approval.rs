//! Request-approval command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use provenant_core::{ApprovalRequest, ReportContext, request_approval};
use provenant_git::Repository;
use tracing::info;

use super::{ArtifactArgs, connect};
use crate::cli::GlobalArgs;

/// Arguments for the request-approval command.
#[derive(Debug, Args)]
pub struct ApprovalArgs {
    #[command(flatten)]
    pub artifact: ArtifactArgs,

    /// Pipeline the artifact belongs to
    #[arg(short, long, env = "PROVENANT_PIPELINE")]
    pub pipeline: String,

    /// Last commit already approved; the review starts after it
    #[arg(long)]
    pub oldest_commit: String,

    /// Commit the review runs up to
    #[arg(long, default_value = "HEAD")]
    pub newest_commit: String,

    /// Root of the git repository
    #[arg(long, default_value = ".")]
    pub repo_root: PathBuf,

    /// What is being approved
    #[arg(short, long, default_value = "")]
    pub description: String,
}

/// Runs the request-approval command.
pub fn run(global: &GlobalArgs, args: ApprovalArgs) -> Result<()> {
    let config = global.load_config(&args.repo_root)?;
    let ledger = connect(&config)?;

    let (fingerprint, _) = args.artifact.identify()?;
    let repo = Repository::open(&args.repo_root).context("failed to open git repository")?;

    let request = ApprovalRequest {
        pipeline: args.pipeline,
        fingerprint,
        description: args.description,
        oldest_commit: args.oldest_commit,
        newest_commit: args.newest_commit,
    };

    let mut ctx = ReportContext::new(&config).dry_run(global.dry_run);
    let payload = request_approval(&mut ctx, &ledger, &repo, &request)
        .with_context(|| format!("failed to request approval for {}", request.fingerprint))?;

    if !ctx.warnings().is_empty() {
        info!(count = ctx.warnings().len(), "approval requested with warnings");
    }
    println!(
        "{} approval requested ({} commits)",
        payload.artifact_sha256,
        payload.src_commit_list.len()
    );
    Ok(())
}
