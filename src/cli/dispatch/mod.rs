//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to an [`Action`]: the API server by default, or
//! the `users` listing subcommand.

use crate::cli::actions::{server, users, Action};
use crate::cli::commands::{self, provider};
use anyhow::Result;

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let provider_opts = provider::Options::parse(matches)?;

    if matches.subcommand_name() == Some(commands::CMD_USERS) {
        return Ok(Action::Users(users::Args {
            provider: provider_opts,
        }));
    }

    let port = matches
        .get_one::<u16>(commands::ARG_PORT)
        .copied()
        .unwrap_or(8080);
    let server_opts = commands::server::Options::parse(matches);

    Ok(Action::Server(server::Args {
        port,
        provider: provider_opts,
        frontend_base_url: server_opts.frontend_base_url,
        redirect_url: server_opts.redirect_url,
    }))
}
