use anyhow::{Result, bail};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::time::Duration;

pub const ARG_SUBMIT_TIMEOUT_MS: &str = "submit-timeout-ms";
pub const ARG_SIMULATE_FAILURE: &str = "simulate-failure";
pub const ARG_SIMULATE_LATENCY_MS: &str = "simulate-latency-ms";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SUBMIT_TIMEOUT_MS)
                .long("submit-timeout-ms")
                .help("Give up on the completion callback after this many milliseconds (default: wait forever)")
                .env("AUTHFORMS_SUBMIT_TIMEOUT_MS")
                .global(true)
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_SIMULATE_FAILURE)
                .long("simulate-failure")
                .help("Make the demo completion callback reject the submission")
                .env("AUTHFORMS_SIMULATE_FAILURE")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_SIMULATE_LATENCY_MS)
                .long("simulate-latency-ms")
                .help("Delay the demo completion callback by this many milliseconds")
                .env("AUTHFORMS_SIMULATE_LATENCY_MS")
                .global(true)
                .default_value("0")
                .value_parser(clap::value_parser!(u64)),
        )
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub timeout: Option<Duration>,
    pub simulate_failure: bool,
    pub simulate_latency: Duration,
}

impl Options {
    /// Parse submission options.
    ///
    /// # Errors
    /// Returns an error if the timeout is zero.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let timeout = match matches.get_one::<u64>(ARG_SUBMIT_TIMEOUT_MS).copied() {
            Some(0) => bail!("--{ARG_SUBMIT_TIMEOUT_MS} must be greater than 0"),
            Some(ms) => Some(Duration::from_millis(ms)),
            None => None,
        };

        Ok(Self {
            timeout,
            simulate_failure: matches.get_flag(ARG_SIMULATE_FAILURE),
            simulate_latency: Duration::from_millis(
                matches
                    .get_one::<u64>(ARG_SIMULATE_LATENCY_MS)
                    .copied()
                    .unwrap_or(0),
            ),
        })
    }
}
