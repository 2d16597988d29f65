//! Identity provider connection arguments.

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_PROVIDER_URL: &str = "provider-url";
pub const ARG_PROVIDER_ANON_KEY: &str = "provider-anon-key";
pub const ARG_PROVIDER_SERVICE_KEY: &str = "provider-service-key";
pub const ARG_PROVIDER_TIMEOUT_SECONDS: &str = "provider-timeout-seconds";

#[derive(Debug, Clone)]
pub struct Options {
    pub url: String,
    pub anon_key: SecretString,
    pub service_key: SecretString,
    pub timeout_seconds: u64,
}

impl Options {
    /// Parse provider options from CLI matches.
    ///
    /// # Errors
    /// Returns an error if a required argument is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let url = matches
            .get_one::<String>(ARG_PROVIDER_URL)
            .cloned()
            .context("missing required argument: --provider-url")?;
        let anon_key = matches
            .get_one::<String>(ARG_PROVIDER_ANON_KEY)
            .cloned()
            .map(SecretString::from)
            .context("missing required argument: --provider-anon-key")?;
        let service_key = matches
            .get_one::<String>(ARG_PROVIDER_SERVICE_KEY)
            .cloned()
            .map(SecretString::from)
            .context("missing required argument: --provider-service-key")?;
        let timeout_seconds = matches
            .get_one::<u64>(ARG_PROVIDER_TIMEOUT_SECONDS)
            .copied()
            .unwrap_or(10);

        Ok(Self {
            url,
            anon_key,
            service_key,
            timeout_seconds,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_PROVIDER_URL)
                .long(ARG_PROVIDER_URL)
                .help("Identity provider project URL, e.g. https://<project>.supabase.co")
                .env("AUTHGATE_PROVIDER_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PROVIDER_ANON_KEY)
                .long(ARG_PROVIDER_ANON_KEY)
                .help("Restricted (anon) key used for end-user operations")
                .env("AUTHGATE_PROVIDER_ANON_KEY")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_PROVIDER_SERVICE_KEY)
                .long(ARG_PROVIDER_SERVICE_KEY)
                .help("Elevated (service role) key used for administrative operations")
                .env("AUTHGATE_PROVIDER_SERVICE_KEY")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_PROVIDER_TIMEOUT_SECONDS)
                .long(ARG_PROVIDER_TIMEOUT_SECONDS)
                .help("Timeout for identity provider requests, in seconds")
                .env("AUTHGATE_PROVIDER_TIMEOUT_SECONDS")
                .default_value("10")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}
