use clap::{Arg, ArgMatches, Command};

pub const ARG_FRONTEND_BASE_URL: &str = "frontend-base-url";
pub const ARG_REDIRECT_URL: &str = "redirect-url";

#[derive(Debug, Clone)]
pub struct Options {
    pub frontend_base_url: String,
    pub redirect_url: Option<String>,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        Self {
            frontend_base_url: matches
                .get_one::<String>(ARG_FRONTEND_BASE_URL)
                .cloned()
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
            redirect_url: matches.get_one::<String>(ARG_REDIRECT_URL).cloned(),
        }
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_FRONTEND_BASE_URL)
                .long(ARG_FRONTEND_BASE_URL)
                .help("Frontend base URL; its origin is the only one allowed by CORS")
                .env("AUTHGATE_FRONTEND_BASE_URL")
                .default_value("http://localhost:5173"),
        )
        .arg(
            Arg::new(ARG_REDIRECT_URL)
                .long(ARG_REDIRECT_URL)
                .help("Where signup confirmation and password reset emails send the user")
                .env("AUTHGATE_REDIRECT_URL"),
        )
}
