//! CLI definition.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use provenant_config::{Config, load_or_default};

use crate::commands;

/// Report build artifacts and their git changelog to a compliance ledger.
#[derive(Debug, Parser)]
#[command(name = "provenant")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Ledger host URL
    #[arg(long, global = true, env = "PROVENANT_HOST")]
    pub host: Option<String>,

    /// Organization that owns the pipelines
    #[arg(long, global = true, env = "PROVENANT_OWNER")]
    pub owner: Option<String>,

    /// API token for the ledger
    #[arg(long, global = true, env = "PROVENANT_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// How many times a failed ledger request is retried
    #[arg(long, global = true, env = "PROVENANT_MAX_API_RETRIES")]
    pub max_api_retries: Option<u32>,

    /// Seconds before a ledger request is abandoned
    #[arg(long, global = true, env = "PROVENANT_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Log payloads instead of sending them
    #[arg(short = 'D', long, global = true, env = "PROVENANT_DRY_RUN")]
    pub dry_run: bool,

    /// Configuration file (default: discover provenant.toml)
    #[arg(short, long, global = true, env = "PROVENANT_CONFIG")]
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    /// Loads the configuration file and applies command-line overrides.
    pub fn load_config(&self, start_dir: &Path) -> Result<Config> {
        // Discovery walks parent directories, which a relative "." has none of
        let start_dir = start_dir
            .canonicalize()
            .unwrap_or_else(|_| start_dir.to_path_buf());
        let mut config = load_or_default(self.config.as_deref(), &start_dir)
            .context("failed to load configuration")?;

        if let Some(host) = &self.host {
            config.ledger.host.clone_from(host);
        }
        if let Some(owner) = &self.owner {
            config.ledger.owner = Some(owner.clone());
        }
        if let Some(token) = &self.api_token {
            config.ledger.api_token = Some(token.clone());
        }
        if let Some(retries) = self.max_api_retries {
            config.ledger.max_api_retries = retries;
        }
        if let Some(timeout) = self.timeout {
            config.ledger.timeout_secs = timeout;
        }

        Ok(config)
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Report an artifact and the commits that went into it
    Report(commands::report::ReportArgs),

    /// Ask the ledger for an approval of the commits going into an artifact
    RequestApproval(commands::approval::ApprovalArgs),

    /// Print the SHA-256 fingerprint of a file
    Fingerprint(commands::fingerprint::FingerprintArgs),

    /// Check that the ledger is reachable
    Status,

    /// Recompute and upload the changelog of every artifact in a pipeline
    #[command(hide = true)]
    BackfillCommits(commands::backfill::BackfillArgs),
}

impl Cli {
    /// Runs the CLI command.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Report(args) => commands::report::run(&self.global, args),
            Commands::RequestApproval(args) => commands::approval::run(&self.global, args),
            Commands::Fingerprint(args) => commands::fingerprint::run(args),
            Commands::Status => commands::status::run(&self.global),
            Commands::BackfillCommits(args) => commands::backfill::run(&self.global, args),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "provenant",
            "--host",
            "https://ledger.example.com",
            "--owner",
            "acme",
            "--max-api-retries",
            "0",
            "--timeout",
            "5",
            "status",
        ])
        .unwrap();

        let dir = tempfile::TempDir::new().unwrap();
        let config = cli.global.load_config(dir.path()).unwrap();
        assert_eq!(config.ledger.host, "https://ledger.example.com");
        assert_eq!(config.ledger.owner.as_deref(), Some("acme"));
        assert_eq!(config.ledger.max_api_retries, 0);
        assert_eq!(config.ledger.timeout_secs, 5);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["provenant", "fingerprint", "a.bin", "--verbose"]).unwrap();
        assert!(cli.global.verbose);
    }

    #[test]
    fn test_request_approval_requires_oldest_commit() {
        let result = Cli::try_parse_from(["provenant", "request-approval", "-p", "backend", "a.bin"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from([
            "provenant",
            "request-approval",
            "-p",
            "backend",
            "--oldest-commit",
            "v1.0",
            "a.bin",
        ])
        .unwrap();
        let Commands::RequestApproval(args) = cli.command else {
            panic!("expected request-approval");
        };
        assert_eq!(args.oldest_commit, "v1.0");
        assert_eq!(args.newest_commit, "HEAD");
        assert_eq!(args.artifact.artifact.as_deref(), Some("a.bin"));
    }
}
