//! Backfill command.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use provenant_core::{ReportContext, backfill_pipeline};
use provenant_git::Repository;

use super::connect;
use crate::cli::GlobalArgs;

/// Arguments for the backfill-commits command.
#[derive(Debug, Args)]
pub struct BackfillArgs {
    /// Pipeline whose artifacts are backfilled
    pub pipeline: String,

    /// Root of the git repository
    #[arg(long, default_value = ".")]
    pub repo_root: PathBuf,
}

/// Runs the backfill-commits command.
pub fn run(global: &GlobalArgs, args: BackfillArgs) -> Result<()> {
    let config = global.load_config(&args.repo_root)?;
    let ledger = connect(&config)?;
    let repo = Repository::open(&args.repo_root).context("failed to open git repository")?;

    let mut ctx = ReportContext::new(&config).dry_run(global.dry_run);
    let mut out = io::stdout().lock();
    backfill_pipeline(&mut ctx, &ledger, &repo, &args.pipeline, &mut out)
        .with_context(|| format!("failed to backfill pipeline {}", args.pipeline))?;
    Ok(())
}
