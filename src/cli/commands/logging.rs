use clap::{
    Arg, ArgMatches, Command,
    builder::{PossibleValuesParser, ValueParser},
};

pub const ARG_VERBOSITY: &str = "verbosity";
pub const ARG_LOG_FORMAT: &str = "log-format";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[must_use]
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

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_VERBOSITY)
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("AUTHFORMS_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
        .arg(
            Arg::new(ARG_LOG_FORMAT)
                .long("log-format")
                .help("Log output format, logs always go to stderr")
                .env("AUTHFORMS_LOG_FORMAT")
                .global(true)
                .default_value("pretty")
                .value_parser(PossibleValuesParser::new(["pretty", "json"])),
        )
}

#[must_use]
pub fn log_format(matches: &ArgMatches) -> LogFormat {
    match matches.get_one::<String>(ARG_LOG_FORMAT).map(String::as_str) {
        Some("json") => LogFormat::Json,
        _ => LogFormat::Pretty,
    }
}
