//! Status command.

use std::env;

use anyhow::{Context, Result};
use provenant_ledger::Ledger;

use super::client;
use crate::cli::GlobalArgs;

/// Runs the status command.
pub fn run(global: &GlobalArgs) -> Result<()> {
    let config = global.load_config(&env::current_dir()?)?;
    let ledger = &config.ledger;

    // The ready endpoint needs no credentials
    let client = client(
        &config,
        ledger.owner.as_deref().unwrap_or_default(),
        ledger.api_token.as_deref().unwrap_or_default(),
    )?;

    client
        .ready()
        .with_context(|| format!("ledger at {} is not ready", ledger.host))?;
    println!("OK");
    Ok(())
}
