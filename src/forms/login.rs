//! Login form: `email` and `password`.

use crate::forms::{
    FieldKind, FieldSpec, FormController, FormError, FormSchema, Notice, Rule, SubmissionConfig,
    validator::deserialize_secret,
};
use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

pub const FORM_NAME: &str = "login";
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Typed login record.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    #[serde(deserialize_with = "deserialize_secret")]
    pub password: SecretString,
}

/// # Errors
/// Returns an error if the schema definition is inconsistent.
pub fn schema() -> Result<FormSchema, FormError> {
    FormSchema::builder(FORM_NAME)
        .field(
            FieldSpec::new("email", FieldKind::Email)
                .check(Rule::Required, "required")
                .check(Rule::Email, "invalid format"),
        )
        .field(
            FieldSpec::new("password", FieldKind::Password)
                .check(Rule::MinLength(MIN_PASSWORD_LENGTH), "min length 6"),
        )
        .build()
}

#[must_use]
pub fn failure_notice() -> Notice {
    Notice::error("Error", "There was an error signing in.")
}

#[must_use]
pub fn success_notice() -> Notice {
    Notice::success("Success", "Signed in.")
}

/// Controller for a freshly mounted login form.
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{RawValues, validate};
    use secrecy::ExposeSecret;

    #[test]
    fn record_converts_to_login_form() {
        let Ok(schema) = schema() else {
            panic!("login schema should build");
        };
        let values: RawValues = [
            ("email".to_string(), "user@example.com".to_string()),
            ("password".to_string(), "secret1".to_string()),
        ]
        .into_iter()
        .collect();

        let form = validate(&schema, &values)
            .ok()
            .and_then(|record| record.into_model::<LoginForm>().ok());
        let Some(form) = form else {
            panic!("record should convert");
        };
        assert_eq!(form.email, "user@example.com");
        assert_eq!(form.password.expose_secret(), "secret1");
        assert!(!format!("{form:?}").contains("secret1"));
    }

    #[test]
    fn controller_uses_login_failure_notice() {
        let Ok(controller) = controller(None) else {
            panic!("login controller should build");
        };
        assert_eq!(controller.schema().name(), FORM_NAME);
        assert_eq!(controller.submission_config().failure_notice, failure_notice());
        assert_eq!(controller.submission_config().timeout, None);
    }
}
