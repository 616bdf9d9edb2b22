//! Report command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use provenant_core::{ArtifactRequest, ReportContext, report_artifact};
use provenant_git::Repository;
use tracing::info;

use super::{ArtifactArgs, connect};
use crate::cli::GlobalArgs;

/// Arguments for the report command.
#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub artifact: ArtifactArgs,

    /// Pipeline the artifact belongs to
    #[arg(short, long, env = "PROVENANT_PIPELINE")]
    pub pipeline: String,

    /// Commit the artifact was built from
    #[arg(short, long, default_value = "HEAD")]
    pub git_commit: String,

    /// Root of the git repository
    #[arg(long, default_value = ".")]
    pub repo_root: PathBuf,

    /// Link to the CI build
    #[arg(short, long, default_value = "", env = "PROVENANT_BUILD_URL")]
    pub build_url: String,

    /// Link to the commit in the source host
    #[arg(long, default_value = "", env = "PROVENANT_COMMIT_URL")]
    pub commit_url: String,

    /// Artifact description
    #[arg(short, long, default_value = "")]
    pub description: String,
}

/// Runs the report command.
pub fn run(global: &GlobalArgs, args: ReportArgs) -> Result<()> {
    let config = global.load_config(&args.repo_root)?;
    let ledger = connect(&config)?;

    let (fingerprint, filename) = args.artifact.identify()?;
    let repo = Repository::open(&args.repo_root).context("failed to open git repository")?;

    let request = ArtifactRequest {
        pipeline: args.pipeline,
        fingerprint,
        filename,
        git_commit: args.git_commit,
        description: args.description,
        build_url: args.build_url,
        commit_url: args.commit_url,
    };

    let mut ctx = ReportContext::new(&config).dry_run(global.dry_run);
    let payload = report_artifact(&mut ctx, &ledger, &repo, &request)
        .with_context(|| format!("failed to report artifact {}", request.filename))?;

    if !ctx.warnings().is_empty() {
        info!(count = ctx.warnings().len(), "report completed with warnings");
    }
    println!(
        "{} {} ({} commits)",
        payload.sha256,
        payload.filename,
        payload.commits_list.len()
    );
    Ok(())
}
