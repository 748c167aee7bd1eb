//! Evaluates a [`FormSchema`] against raw field values.

use crate::forms::{FormError, FormSchema, Rule};
use once_cell::sync::Lazy;
use regex::Regex;
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Raw input keyed by field name, exactly as the UI delivered it.
pub type RawValues = BTreeMap<String, String>;

static EMAIL_PATTERN: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$"));

/// Field name to message. A field without an entry is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorMap(BTreeMap<String, String>);

impl ErrorMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub(crate) fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    /// Records the first error for a field; later ones are dropped.
    fn insert_first(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }
}

impl<K, V> FromIterator<(K, V)> for ErrorMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Output of a successful validation pass. Values are the raw input,
/// unmodified.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidatedRecord(BTreeMap<String, String>);

impl ValidatedRecord {
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Consume the record into a typed form model such as
    /// [`LoginForm`](crate::forms::LoginForm).
    ///
    /// # Errors
    /// Returns an error if the record lacks a field the model requires.
    pub fn into_model<T: DeserializeOwned>(self) -> Result<T, FormError> {
        let value = serde_json::to_value(self.0)?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Deserialize a plain string field straight into a [`SecretString`].
pub(crate) fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

// Values may be passwords.
impl std::fmt::Debug for ValidatedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

/// Single dispatch point for every [`Rule`].
fn passes(rule: &Rule, value: &str, values: &RawValues) -> bool {
    match rule {
        Rule::Required => !value.is_empty(),
        Rule::MinLength(min) => value.chars().count() >= *min,
        Rule::Email => EMAIL_PATTERN
            .as_ref()
            .is_ok_and(|regex| regex.is_match(value)),
        Rule::Format(regex) => regex.is_match(value),
        Rule::EqualsField(other) => value == value_of(values, other),
    }
}

fn value_of<'a>(values: &'a RawValues, field: &str) -> &'a str {
    values.get(field).map_or("", String::as_str)
}

/// Validate `values` against `schema`.
///
/// Every field is checked so the [`ErrorMap`] reports all violations at once;
/// within a field the first failing check wins. Cross-field checks run last
/// and report on their dependent field. Missing fields count as empty strings
/// and nothing is trimmed.
///
/// # Errors
/// Returns the [`ErrorMap`] when any check fails. There is no partial record.
#[instrument(skip_all, fields(form = schema.name()))]
pub fn validate(schema: &FormSchema, values: &RawValues) -> Result<ValidatedRecord, ErrorMap> {
    let mut errors = ErrorMap::new();

    for spec in schema.fields() {
        let value = value_of(values, spec.name());
        if let Some(check) = spec
            .checks()
            .iter()
            .find(|check| !passes(&check.rule, value, values))
        {
            errors.insert_first(spec.name(), &check.message);
        }
    }

    for cross in schema.cross_field() {
        let check = cross.check();
        if !passes(&check.rule, value_of(values, cross.field()), values) {
            errors.insert_first(cross.field(), &check.message);
        }
    }

    if !errors.is_empty() {
        debug!(fields = ?errors.fields().collect::<Vec<_>>(), "validation failed");
        return Err(errors);
    }

    let record = schema
        .field_names()
        .map(|name| (name.to_string(), value_of(values, name).to_string()))
        .collect();

    Ok(ValidatedRecord(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{FieldKind, FieldSpec, login, register};

    fn raw(pairs: &[(&str, &str)]) -> RawValues {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn login_schema() -> FormSchema {
        match login::schema() {
            Ok(schema) => schema,
            Err(err) => panic!("login schema: {err}"),
        }
    }

    fn register_schema() -> FormSchema {
        match register::schema() {
            Ok(schema) => schema,
            Err(err) => panic!("register schema: {err}"),
        }
    }

    #[test]
    fn email_pattern_accepts_basic_format() {
        let values = RawValues::new();
        assert!(passes(&Rule::Email, "a@example.com", &values));
        assert!(passes(&Rule::Email, "name.surname@example.co", &values));
    }

    #[test]
    fn email_pattern_rejects_missing_parts() {
        let values = RawValues::new();
        assert!(!passes(&Rule::Email, "not-an-email", &values));
        assert!(!passes(&Rule::Email, "missing-at.example.com", &values));
        assert!(!passes(&Rule::Email, "missing-domain@", &values));
        assert!(!passes(&Rule::Email, "user@localhost", &values));
        assert!(!passes(&Rule::Email, " user@example.com", &values));
    }

    #[test]
    fn min_length_counts_characters_not_bytes() {
        let values = RawValues::new();
        assert!(passes(&Rule::MinLength(3), "ñúé", &values));
        assert!(!passes(&Rule::MinLength(4), "ñúé", &values));
    }

    #[test]
    fn reports_every_failing_field() {
        let result = validate(
            &login_schema(),
            &raw(&[("email", "bad"), ("password", "abc")]),
        );
        let expected: ErrorMap = [("email", "invalid format"), ("password", "min length 6")]
            .into_iter()
            .collect();
        assert_eq!(result.err(), Some(expected));
    }

    #[test]
    fn passing_values_are_returned_unmodified() {
        let result = validate(
            &login_schema(),
            &raw(&[("email", "user@example.com"), ("password", " secret1 ")]),
        );
        let Ok(record) = result else {
            panic!("record should validate");
        };
        assert_eq!(record.get("email"), Some("user@example.com"));
        assert_eq!(record.get("password"), Some(" secret1 "));
        assert_eq!(
            serde_json::to_value(&record).ok(),
            Some(serde_json::json!({"email": "user@example.com", "password": " secret1 "}))
        );
    }

    #[test]
    fn empty_value_fails_required_before_format() {
        let result = validate(&login_schema(), &raw(&[("password", "secret1")]));
        let Err(errors) = result else {
            panic!("empty email must fail");
        };
        assert_eq!(errors.get("email"), Some("required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn whitespace_is_not_trimmed() {
        let result = validate(
            &login_schema(),
            &raw(&[("email", "user@example.com "), ("password", "secret1")]),
        );
        let Err(errors) = result else {
            panic!("trailing space makes the email invalid");
        };
        assert_eq!(errors.get("email"), Some("invalid format"));
    }

    #[test]
    fn mismatch_is_reported_on_dependent_field() {
        let result = validate(
            &register_schema(),
            &raw(&[
                ("username", "alice"),
                ("email", "alice@example.com"),
                ("password", "secret1"),
                ("confirmPassword", "secret2"),
            ]),
        );
        let expected: ErrorMap = [("confirmPassword", "passwords do not match")]
            .into_iter()
            .collect();
        assert_eq!(result.err(), Some(expected));
    }

    #[test]
    fn cross_field_keeps_first_error_on_dependent_field() {
        let schema = FormSchema::builder("pin")
            .field(FieldSpec::new("pin", FieldKind::Password))
            .field(
                FieldSpec::new("confirmPin", FieldKind::Password)
                    .check(Rule::Required, "required"),
            )
            .cross_field("confirmPin", Rule::EqualsField("pin".to_string()), "mismatch")
            .build();
        let Ok(schema) = schema else {
            panic!("schema should build");
        };
        let result = validate(&schema, &raw(&[("pin", "1234")]));
        assert_eq!(
            result.err().and_then(|e| e.get("confirmPin").map(str::to_string)),
            Some("required".to_string())
        );
    }

    #[test]
    fn validation_is_idempotent() {
        let schema = register_schema();
        let values = raw(&[
            ("username", "al"),
            ("email", "al@example"),
            ("password", "secret1"),
            ("confirmPassword", "secret1"),
        ]);
        let first = validate(&schema, &values);
        let second = validate(&schema, &values);
        assert_eq!(first, second);
        assert!(first.is_err());
    }

    #[test]
    fn format_rule_is_checked() {
        let Ok(rule) = Rule::format("^[a-z0-9_]+$") else {
            panic!("pattern should compile");
        };
        let schema = FormSchema::builder("handle")
            .field(FieldSpec::new("handle", FieldKind::Text).check(rule, "invalid handle"))
            .build();
        let Ok(schema) = schema else {
            panic!("schema should build");
        };
        assert!(validate(&schema, &raw(&[("handle", "good_one")])).is_ok());
        assert_eq!(
            validate(&schema, &raw(&[("handle", "Bad One")]))
                .err()
                .and_then(|e| e.get("handle").map(str::to_string)),
            Some("invalid handle".to_string())
        );
    }

    #[test]
    fn record_debug_hides_values() {
        let result = validate(
            &login_schema(),
            &raw(&[("email", "user@example.com"), ("password", "secret1")]),
        );
        let Ok(record) = result else {
            panic!("record should validate");
        };
        let debug = format!("{record:?}");
        assert!(!debug.contains("secret1"));
        assert!(debug.contains("password"));
    }
}
