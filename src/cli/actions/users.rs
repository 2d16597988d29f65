use crate::cli::{actions::server::build_gateway, commands::provider};
use anyhow::{Context, Result};
use std::io::Write;

#[derive(Debug)]
pub struct Args {
    pub provider: provider::Options,
}

/// Print every provider account as a JSON array on stdout.
/// # Errors
/// Returns an error if the provider refuses the listing or stdout is closed.
pub async fn execute(args: Args) -> Result<()> {
    let gateway = build_gateway(&args.provider)?;

    let users = gateway
        .list_users()
        .await
        .context("Failed to list identity provider users")?;

    let json = serde_json::to_string_pretty(&users)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")?;

    Ok(())
}
