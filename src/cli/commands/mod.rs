use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};

/// Default consent text submitted when `--text` is not given.
pub const DEFAULT_CONSENT_TEXT: &str =
    "I agree to the current Beema terms of service and privacy policy.";

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("beema")
        .about("Session and consent client for the Beema platform")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("api-url")
                .short('a')
                .long("api-url")
                .help("Backend base URL, example: https://api.beema.app")
                .env("BEEMA_API_URL")
                .global(true),
        )
        .arg(
            Arg::new("session-file")
                .short('s')
                .long("session-file")
                .help("Path of the persisted session file")
                .default_value(".beema/session.json")
                .env("BEEMA_SESSION_FILE")
                .global(true),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("BEEMA_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
        .subcommand(
            Command::new("login")
                .about("Sign in or sign up with a one-time code")
                .arg(
                    Arg::new("mobile")
                        .help("Mobile number the code is sent to")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("agent-register")
                .about("Apply for an agent account (single-shot, no OTP)")
                .arg(
                    Arg::new("name")
                        .long("name")
                        .help("Agent name")
                        .required(true),
                )
                .arg(
                    Arg::new("phone")
                        .long("phone")
                        .help("Agent phone number")
                        .required(true),
                )
                .arg(
                    Arg::new("state")
                        .long("state")
                        .help("State the agent operates in")
                        .required(true),
                )
                .arg(
                    Arg::new("mandi")
                        .long("mandi")
                        .help("Mandi the agent is attached to")
                        .required(true),
                )
                .arg(
                    Arg::new("aadhaar-number")
                        .long("aadhaar-number")
                        .help("Aadhaar number on the submitted document")
                        .required(true),
                )
                .arg(
                    Arg::new("photo")
                        .long("photo")
                        .help("Path of the aadhaar document photo")
                        .required(true),
                ),
        )
        .subcommand(Command::new("whoami").about("Show the current session and consent state"))
        .subcommand(
            Command::new("consent")
                .about("Acknowledge the current terms")
                .arg(
                    Arg::new("text")
                        .long("text")
                        .help("Consent text to acknowledge")
                        .default_value(DEFAULT_CONSENT_TEXT),
                ),
        )
        .subcommand(Command::new("logout").about("Clear the local session"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "beema");
        assert_eq!(
            command.get_about().unwrap().to_string(),
            "Session and consent client for the Beema platform"
        );
        assert_eq!(
            command.get_version().unwrap().to_string(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_check_api_url_and_session_file() {
        let command = new();
        let matches = command.get_matches_from(vec![
            "beema",
            "--api-url",
            "https://api.beema.app",
            "--session-file",
            "/tmp/session.json",
            "whoami",
        ]);

        assert_eq!(
            matches.get_one::<String>("api-url").map(|s| s.to_string()),
            Some("https://api.beema.app".to_string())
        );
        assert_eq!(
            matches
                .get_one::<String>("session-file")
                .map(|s| s.to_string()),
            Some("/tmp/session.json".to_string())
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("BEEMA_API_URL", Some("https://api.beema.app")),
                ("BEEMA_SESSION_FILE", Some("/tmp/session.json")),
                ("BEEMA_LOG_LEVEL", Some("info")),
            ],
            || {
                let command = new();
                let matches = command.get_matches_from(vec!["beema", "whoami"]);
                assert_eq!(
                    matches.get_one::<String>("api-url").map(|s| s.to_string()),
                    Some("https://api.beema.app".to_string())
                );
                assert_eq!(
                    matches
                        .get_one::<String>("session-file")
                        .map(|s| s.to_string()),
                    Some("/tmp/session.json".to_string())
                );
                assert_eq!(matches.get_one::<u8>("verbosity").map(|s| *s), Some(2));
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars(
                [
                    ("BEEMA_LOG_LEVEL", Some(level)),
                    ("BEEMA_API_URL", Some("https://api.beema.app")),
                ],
                || {
                    let command = new();
                    let matches = command.get_matches_from(vec!["beema", "whoami"]);
                    assert_eq!(
                        matches.get_one::<u8>("verbosity").map(|s| *s),
                        Some(index as u8)
                    );
                },
            );
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            temp_env::with_vars([("BEEMA_LOG_LEVEL", None::<String>)], || {
                let mut args = vec![
                    "beema".to_string(),
                    "--api-url".to_string(),
                    "https://api.beema.app".to_string(),
                    "whoami".to_string(),
                ];

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    let v = format!("-{}", "v".repeat(index));
                    args.push(v);
                }

                let command = new();

                let matches = command.get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>("verbosity").map(|s| *s),
                    Some(index as u8)
                );
            });
        }
    }

    #[test]
    fn test_login_subcommand_takes_a_mobile_number() {
        let command = new();
        let matches = command.get_matches_from(vec![
            "beema",
            "--api-url",
            "https://api.beema.app",
            "login",
            "9999999999",
        ]);
        let sub = matches.subcommand_matches("login").unwrap();
        assert_eq!(
            sub.get_one::<String>("mobile").map(|s| s.to_string()),
            Some("9999999999".to_string())
        );
    }

    #[test]
    fn test_consent_subcommand_has_a_default_text() {
        let command = new();
        let matches = command.get_matches_from(vec![
            "beema",
            "--api-url",
            "https://api.beema.app",
            "consent",
        ]);
        let sub = matches.subcommand_matches("consent").unwrap();
        assert_eq!(
            sub.get_one::<String>("text").map(|s| s.to_string()),
            Some(DEFAULT_CONSENT_TEXT.to_string())
        );
    }
}
