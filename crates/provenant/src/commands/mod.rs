//! CLI commands.

pub mod approval;
pub mod backfill;
pub mod fingerprint;
pub mod report;
pub mod status;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Args;
use provenant_config::Config;
use provenant_core::{artifact_filename, fingerprint_file};
use provenant_ledger::HttpLedger;

/// Identifies the artifact a command is about.
#[derive(Debug, Args)]
pub struct ArtifactArgs {
    /// Artifact file, or artifact name (e.g. an image) when --sha256 is given
    pub artifact: Option<String>,

    /// Precomputed SHA-256 of the artifact
    #[arg(short, long)]
    pub sha256: Option<String>,
}

impl ArtifactArgs {
    /// Returns the fingerprint and reported name of the artifact.
    ///
    /// A name given with `--sha256` is reported as is. A fingerprinted file
    /// is reported under its base name.
    pub fn identify(&self) -> Result<(String, String)> {
        let Some(artifact) = self.artifact.as_deref() else {
            bail!("an artifact name or path is required");
        };

        match &self.sha256 {
            Some(sha256) => Ok((validate_sha256(sha256)?, artifact.to_string())),
            None => {
                let fingerprint = fingerprint_file(Path::new(artifact))
                    .context("failed to fingerprint artifact")?;
                Ok((fingerprint, artifact_filename(artifact)))
            }
        }
    }
}

fn validate_sha256(value: &str) -> Result<String> {
    let value = value.trim();
    if value.len() != 64 || !value.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("invalid SHA-256 fingerprint: {value}");
    }
    Ok(value.to_ascii_lowercase())
}

/// Builds a ledger client from the configuration.
fn client(config: &Config, owner: &str, token: &str) -> Result<HttpLedger> {
    let ledger = &config.ledger;
    let client = HttpLedger::new(&ledger.host, owner, token, ledger.max_api_retries)
        .context("failed to create ledger client")?;
    Ok(client.with_timeout(Duration::from_secs(ledger.timeout_secs)))
}

/// Builds an authenticated ledger client from the configuration.
fn connect(config: &Config) -> Result<HttpLedger> {
    let (owner, token) = config
        .ledger
        .credentials()
        .context("invalid ledger configuration")?;
    client(config, owner, token)
}
