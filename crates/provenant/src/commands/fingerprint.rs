//! Fingerprint command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use provenant_core::fingerprint_file;

/// Arguments for the fingerprint command.
#[derive(Debug, Args)]
pub struct FingerprintArgs {
    /// File to fingerprint
    pub path: PathBuf,
}

/// Runs the fingerprint command.
pub fn run(args: FingerprintArgs) -> Result<()> {
    let digest = fingerprint_file(&args.path)?;
    println!("{digest}");
    Ok(())
}
