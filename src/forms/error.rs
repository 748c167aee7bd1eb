use thiserror::Error;

/// Misuse of the forms API.
///
/// Validation failures are not errors in this sense: they come back as an
/// [`ErrorMap`](super::ErrorMap) for display.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("duplicate field: {0}")]
    DuplicateField(String),
    #[error("check on {field} references unknown field {referenced}")]
    UnknownReference { field: String, referenced: String },
    #[error("form is submitting")]
    Busy,
    #[error("invalid format pattern")]
    Pattern(#[from] regex::Error),
    #[error("record does not match the form model")]
    Model(#[from] serde_json::Error),
}
