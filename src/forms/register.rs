//! Registration form: `username`, `email`, `password`, `confirmPassword`.
//!
//! The confirmation is a cross-field check, so a mismatch is reported on
//! `confirmPassword` and never on `password`.

use crate::forms::{
    FieldKind, FieldSpec, FormController, FormError, FormSchema, Notice, Rule, SubmissionConfig,
    validator::deserialize_secret,
};
use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

pub const FORM_NAME: &str = "register";
pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    #[serde(deserialize_with = "deserialize_secret")]
    pub password: SecretString,
    #[serde(deserialize_with = "deserialize_secret")]
    pub confirm_password: SecretString,
}

/// # Errors
/// Returns an error if the schema definition is inconsistent.
pub fn schema() -> Result<FormSchema, FormError> {
    FormSchema::builder(FORM_NAME)
        .field(
            FieldSpec::new("username", FieldKind::Text)
                .check(Rule::MinLength(MIN_USERNAME_LENGTH), "min length 3"),
        )
        .field(
            FieldSpec::new("email", FieldKind::Email)
                .check(Rule::Required, "required")
                .check(Rule::Email, "invalid format"),
        )
        .field(
            FieldSpec::new("password", FieldKind::Password)
                .check(Rule::MinLength(MIN_PASSWORD_LENGTH), "min length 6"),
        )
        .field(FieldSpec::new("confirmPassword", FieldKind::Password))
        .cross_field(
            "confirmPassword",
            Rule::EqualsField("password".to_string()),
            "passwords do not match",
        )
        .build()
}

#[must_use]
pub fn failure_notice() -> Notice {
    Notice::error("Error", "There was an error creating your account.")
}

#[must_use]
pub fn success_notice() -> Notice {
    Notice::success("Success", "Account created.")
}

/// Controller for a freshly mounted registration form.
///
/// # Errors
/// Returns an error if the schema definition is inconsistent.
pub fn controller(timeout: Option<Duration>) -> Result<FormController, FormError> {
    let config = SubmissionConfig {
        timeout,
        failure_notice: failure_notice(),
    };
    Ok(FormController::new(schema()?, config))
}
