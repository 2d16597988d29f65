pub mod logging;
pub mod provider;
pub mod server;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_PORT: &str = "port";
pub const CMD_USERS: &str = "users";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("authgate")
        .about("Authentication gateway for a hosted identity provider")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("AUTHGATE_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .subcommand(
            Command::new(CMD_USERS)
                .about("List identity provider users with the elevated credential (JSON)"),
        );

    let command = provider::with_args(command);
    let command = server::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENV_VARS: [&str; 8] = [
        "AUTHGATE_PORT",
        "AUTHGATE_PROVIDER_URL",
        "AUTHGATE_PROVIDER_ANON_KEY",
        "AUTHGATE_PROVIDER_SERVICE_KEY",
        "AUTHGATE_PROVIDER_TIMEOUT_SECONDS",
        "AUTHGATE_FRONTEND_BASE_URL",
        "AUTHGATE_REDIRECT_URL",
        "AUTHGATE_LOG_LEVEL",
    ];

    fn required_args() -> Vec<&'static str> {
        vec![
            "authgate",
            "--provider-url",
            "https://project.supabase.co",
            "--provider-anon-key",
            "anon",
            "--provider-service-key",
            "service",
        ]
    }

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "authgate");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("Authentication gateway for a hosted identity provider".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_defaults() {
        temp_env::with_vars_unset(ENV_VARS, || {
            let matches = new().get_matches_from(required_args());
            assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(8080));
            assert_eq!(
                matches
                    .get_one::<String>(server::ARG_FRONTEND_BASE_URL)
                    .cloned(),
                Some("http://localhost:5173".to_string())
            );
            assert_eq!(matches.get_one::<String>(server::ARG_REDIRECT_URL), None);
            assert_eq!(
                matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                Some(0)
            );
            assert!(matches.subcommand().is_none());
        });
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("AUTHGATE_PORT", Some("443")),
                ("AUTHGATE_PROVIDER_URL", Some("https://project.supabase.co")),
                ("AUTHGATE_PROVIDER_ANON_KEY", Some("anon")),
                ("AUTHGATE_PROVIDER_SERVICE_KEY", Some("service")),
                ("AUTHGATE_PROVIDER_TIMEOUT_SECONDS", Some("5")),
                ("AUTHGATE_FRONTEND_BASE_URL", Some("https://app.example.com")),
                ("AUTHGATE_REDIRECT_URL", Some("https://app.example.com/reset")),
                ("AUTHGATE_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["authgate"]);
                assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(443));
                assert_eq!(
                    matches
                        .get_one::<String>(provider::ARG_PROVIDER_URL)
                        .cloned(),
                    Some("https://project.supabase.co".to_string())
                );
                assert_eq!(
                    matches
                        .get_one::<u64>(provider::ARG_PROVIDER_TIMEOUT_SECONDS)
                        .copied(),
                    Some(5)
                );
                assert_eq!(
                    matches.get_one::<String>(server::ARG_REDIRECT_URL).cloned(),
                    Some("https://app.example.com/reset".to_string())
                );
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars(
                [
                    ("AUTHGATE_LOG_LEVEL", Some(level)),
                    ("AUTHGATE_PROVIDER_URL", Some("https://project.supabase.co")),
                    ("AUTHGATE_PROVIDER_ANON_KEY", Some("anon")),
                    ("AUTHGATE_PROVIDER_SERVICE_KEY", Some("service")),
                ],
                || {
                    let matches = new().get_matches_from(vec!["authgate"]);
                    assert_eq!(
                        matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                        u8::try_from(index).ok()
                    );
                },
            );
        }
    }

    #[test]
    fn test_users_subcommand() {
        temp_env::with_vars_unset(ENV_VARS, || {
            let mut args = required_args();
            args.push(CMD_USERS);
            let matches = new().get_matches_from(args);
            assert_eq!(matches.subcommand_name(), Some(CMD_USERS));
        });
    }

    #[test]
    fn test_missing_provider_url() {
        temp_env::with_vars_unset(ENV_VARS, || {
            let result = new().try_get_matches_from(vec![
                "authgate",
                "--provider-anon-key",
                "anon",
                "--provider-service-key",
                "service",
            ]);
            assert!(result.is_err());
        });
    }
}
