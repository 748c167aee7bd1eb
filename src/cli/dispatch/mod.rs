//! Maps validated CLI matches to the form action to run.

use crate::cli::actions::{Action, login, register};
use crate::cli::commands::{forms, submission};
use anyhow::{Result, anyhow};
use clap::ArgMatches;
use secrecy::SecretString;

fn text(matches: &ArgMatches, id: &str) -> String {
    matches.get_one::<String>(id).cloned().unwrap_or_default()
}

fn secret(matches: &ArgMatches, id: &str) -> SecretString {
    SecretString::from(text(matches, id))
}

/// Map validated CLI matches to a form action.
///
/// # Errors
/// Returns an error if no form subcommand was given or an option is invalid.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some((forms::CMD_LOGIN, sub)) => Ok(Action::Login(login::Args {
            email: text(sub, forms::ARG_EMAIL),
            password: secret(sub, forms::ARG_PASSWORD),
            submission: submission::Options::parse(sub)?,
        })),
        Some((forms::CMD_REGISTER, sub)) => Ok(Action::Register(register::Args {
            username: text(sub, forms::ARG_USERNAME),
            email: text(sub, forms::ARG_EMAIL),
            password: secret(sub, forms::ARG_PASSWORD),
            confirm_password: secret(sub, forms::ARG_CONFIRM_PASSWORD),
            submission: submission::Options::parse(sub)?,
        })),
        _ => Err(anyhow!(
            "missing subcommand: {} or {}",
            forms::CMD_LOGIN,
            forms::CMD_REGISTER
        )),
    }
}
