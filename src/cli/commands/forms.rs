use clap::{Arg, Command};

pub const CMD_LOGIN: &str = "login";
pub const CMD_REGISTER: &str = "register";

pub const ARG_USERNAME: &str = "username";
pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_CONFIRM_PASSWORD: &str = "confirm-password";

fn email_arg() -> Arg {
    Arg::new(ARG_EMAIL)
        .short('e')
        .long("email")
        .help("Email address, example: user@example.com")
        .env("AUTHFORMS_EMAIL")
}

fn password_arg() -> Arg {
    Arg::new(ARG_PASSWORD)
        .short('p')
        .long("password")
        .help("Password")
        .env("AUTHFORMS_PASSWORD")
        .hide_env_values(true)
}

// Fields are optional on purpose: a missing value is submitted as an empty
// string and reported by the form, not by clap.
#[must_use]
pub fn login() -> Command {
    Command::new(CMD_LOGIN)
        .about("Fill in and submit the login form")
        .arg(email_arg())
        .arg(password_arg())
}

#[must_use]
pub fn register() -> Command {
    Command::new(CMD_REGISTER)
        .about("Fill in and submit the registration form")
        .arg(
            Arg::new(ARG_USERNAME)
                .short('u')
                .long("username")
                .help("Username, at least 3 characters")
                .env("AUTHFORMS_USERNAME"),
        )
        .arg(email_arg())
        .arg(password_arg())
        .arg(
            Arg::new(ARG_CONFIRM_PASSWORD)
                .short('c')
                .long("confirm-password")
                .help("Password confirmation, must match --password")
                .env("AUTHFORMS_CONFIRM_PASSWORD")
                .hide_env_values(true),
        )
}
