//! Declarative form schemas.
//!
//! A [`FormSchema`] is an ordered list of [`FieldSpec`]s plus cross-field
//! checks. Schemas are built once per form and never change afterwards; the
//! builder refuses duplicate field names and checks that point at fields the
//! schema does not declare.

use crate::forms::FormError;
use regex::Regex;
use serde::Serialize;
use std::{borrow::Cow, collections::HashSet};

/// Semantic type of a field. Drives how the presentation layer renders the
/// input and whether the value may appear in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Password,
}

impl FieldKind {
    /// Secret values are never logged.
    #[must_use]
    pub const fn is_secret(self) -> bool {
        matches!(self, Self::Password)
    }
}

/// Closed set of validation rules.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Value must not be the empty string.
    Required,
    /// Value must have at least `n` characters.
    MinLength(usize),
    /// `local@domain.tld`, no whitespace.
    Email,
    /// Value must match the pattern.
    Format(Regex),
    /// Value must equal the value of another field, byte for byte.
    EqualsField(String),
}

impl Rule {
    /// Compile a [`Rule::Format`].
    ///
    /// # Errors
    /// Returns an error if the pattern is not a valid regular expression.
    pub fn format(pattern: &str) -> Result<Self, FormError> {
        Ok(Self::Format(Regex::new(pattern)?))
    }

    fn referenced_field(&self) -> Option<&str> {
        match self {
            Self::EqualsField(other) => Some(other),
            _ => None,
        }
    }
}

/// A rule paired with the message shown when it fails.
#[derive(Debug, Clone)]
pub struct Check {
    pub rule: Rule,
    pub message: Cow<'static, str>,
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    kind: FieldKind,
    checks: Vec<Check>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            checks: Vec::new(),
        }
    }

    /// Append a check. Checks run in the order they were added and the first
    /// failing one supplies the field's message.
    #[must_use]
    pub fn check(mut self, rule: Rule, message: impl Into<Cow<'static, str>>) -> Self {
        self.checks.push(Check {
            rule,
            message: message.into(),
        });
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    #[must_use]
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }
}

/// A check evaluated after every field check. A failure is reported on
/// `field` (the dependent field), never on the field it compares against.
#[derive(Debug, Clone)]
pub struct CrossFieldCheck {
    field: String,
    check: Check,
}

impl CrossFieldCheck {
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[must_use]
    pub const fn check(&self) -> &Check {
        &self.check
    }
}

#[derive(Debug, Clone)]
pub struct FormSchema {
    name: String,
    fields: Vec<FieldSpec>,
    cross_field: Vec<CrossFieldCheck>,
}

impl FormSchema {
    pub fn builder(name: impl Into<String>) -> FormSchemaBuilder {
        FormSchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
            cross_field: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    #[must_use]
    pub fn cross_field(&self) -> &[CrossFieldCheck] {
        &self.cross_field
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldSpec::name)
    }
}

#[derive(Debug)]
pub struct FormSchemaBuilder {
    name: String,
    fields: Vec<FieldSpec>,
    cross_field: Vec<CrossFieldCheck>,
}

impl FormSchemaBuilder {
    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    #[must_use]
    pub fn cross_field(
        mut self,
        field: impl Into<String>,
        rule: Rule,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.cross_field.push(CrossFieldCheck {
            field: field.into(),
            check: Check {
                rule,
                message: message.into(),
            },
        });
        self
    }

    /// Finish the schema.
    ///
    /// # Errors
    /// Returns an error if two fields share a name, or a check targets or
    /// references a field the schema does not declare.
    pub fn build(self) -> Result<FormSchema, FormError> {
        let mut names = HashSet::with_capacity(self.fields.len());
        for spec in &self.fields {
            if !names.insert(spec.name.as_str()) {
                return Err(FormError::DuplicateField(spec.name.clone()));
            }
        }

        let field_refs = self.fields.iter().flat_map(|spec| {
            spec.checks
                .iter()
                .map(move |check| (spec.name.as_str(), &check.rule))
        });
        let cross_refs = self
            .cross_field
            .iter()
            .map(|cross| (cross.field.as_str(), &cross.check.rule));

        for (field, rule) in field_refs.chain(cross_refs) {
            if !names.contains(field) {
                return Err(FormError::UnknownField(field.to_string()));
            }
            if let Some(referenced) = rule.referenced_field()
                && !names.contains(referenced)
            {
                return Err(FormError::UnknownReference {
                    field: field.to_string(),
                    referenced: referenced.to_string(),
                });
            }
        }

        Ok(FormSchema {
            name: self.name,
            fields: self.fields,
            cross_field: self.cross_field,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_keeps_declaration_order() {
        let schema = FormSchema::builder("profile")
            .field(FieldSpec::new("username", FieldKind::Text))
            .field(FieldSpec::new("email", FieldKind::Email))
            .field(FieldSpec::new("password", FieldKind::Password))
            .build();
        let Ok(schema) = schema else {
            panic!("schema should build");
        };
        let names: Vec<&str> = schema.field_names().collect();
        assert_eq!(names, vec!["username", "email", "password"]);
        assert_eq!(schema.name(), "profile");
    }

    #[test]
    fn build_rejects_duplicate_names() {
        let result = FormSchema::builder("dup")
            .field(FieldSpec::new("email", FieldKind::Email))
            .field(FieldSpec::new("email", FieldKind::Text))
            .build();
        assert!(matches!(result, Err(FormError::DuplicateField(name)) if name == "email"));
    }

    #[test]
    fn build_rejects_cross_field_on_unknown_field() {
        let result = FormSchema::builder("login")
            .field(FieldSpec::new("password", FieldKind::Password))
            .cross_field(
                "confirmPassword",
                Rule::EqualsField("password".to_string()),
                "passwords do not match",
            )
            .build();
        assert!(matches!(result, Err(FormError::UnknownField(name)) if name == "confirmPassword"));
    }

    #[test]
    fn build_rejects_dangling_reference() {
        let result = FormSchema::builder("register")
            .field(
                FieldSpec::new("confirmPassword", FieldKind::Password)
                    .check(Rule::EqualsField("password".to_string()), "mismatch"),
            )
            .build();
        assert!(matches!(
            result,
            Err(FormError::UnknownReference { field, referenced })
                if field == "confirmPassword" && referenced == "password"
        ));
    }

    #[test]
    fn format_rejects_bad_pattern() {
        assert!(matches!(Rule::format("(unclosed"), Err(FormError::Pattern(_))));
        assert!(Rule::format("^[a-z]+$").is_ok());
    }

    #[test]
    fn password_kind_is_secret() {
        assert!(FieldKind::Password.is_secret());
        assert!(!FieldKind::Email.is_secret());
        assert!(!FieldKind::Text.is_secret());
    }
}
