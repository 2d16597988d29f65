use crate::{
    api,
    cli::commands::provider,
    gateway::CredentialGateway,
    provider::{CredentialMode, HttpProvider},
};
use anyhow::{Context, Result};
use std::{sync::Arc, time::Duration};
use tracing::{debug, info};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub provider: provider::Options,
    pub frontend_base_url: String,
    pub redirect_url: Option<String>,
}

/// Build the restricted and elevated provider handles and the gateway on top.
///
/// # Errors
/// Returns an error if the provider URL is invalid or an HTTP client cannot be built.
pub fn build_gateway(options: &provider::Options) -> Result<CredentialGateway> {
    let timeout = Duration::from_secs(options.timeout_seconds);

    let restricted = HttpProvider::new(
        &options.url,
        options.anon_key.clone(),
        CredentialMode::Restricted,
        timeout,
    )
    .context("Failed to build restricted provider client")?;
    let elevated = HttpProvider::new(
        &options.url,
        options.service_key.clone(),
        CredentialMode::Elevated,
        timeout,
    )
    .context("Failed to build elevated provider client")?;

    debug!("Identity provider: {}", options.url);

    Ok(CredentialGateway::new(Arc::new(restricted), Arc::new(elevated)))
}

/// Execute the server action.
/// # Errors
/// Returns an error if the gateway cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let gateway = build_gateway(&args.provider)?.with_redirect_url(args.redirect_url);

    info!("Starting authgate");

    api::new(args.port, gateway, &args.frontend_base_url).await
}
