//! JSON document printed on stdout after a submit.

use crate::forms::{ErrorMap, Notice, SubmissionResult, SubmitOutcome};
use anyhow::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Busy,
    Invalid,
    Submitted,
    Failed,
}

#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub form: &'a str,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<&'a ErrorMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'a Notice>,
}

impl<'a> Report<'a> {
    /// `success` is shown when the completion callback resolved.
    #[must_use]
    pub fn new(form: &'a str, outcome: &'a SubmitOutcome, success: &'a Notice) -> Self {
        let (status, errors, notice) = match outcome {
            SubmitOutcome::Busy => (Status::Busy, None, None),
            SubmitOutcome::Invalid(errors) => (Status::Invalid, Some(errors), None),
            SubmitOutcome::Submitted(SubmissionResult::Completed) => {
                (Status::Submitted, None, Some(success))
            }
            SubmitOutcome::Submitted(SubmissionResult::Failed(notice)) => {
                (Status::Failed, None, Some(notice))
            }
        };

        Self {
            form,
            status,
            errors,
            notice,
        }
    }

    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as one JSON document followed by a newline.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "{}", self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn render(outcome: &SubmitOutcome) -> Option<Value> {
        let success = Notice::success("Success", "Signed in.");
        Report::new("login", outcome, &success)
            .to_json()
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
    }

    #[test]
    fn invalid_lists_errors() {
        let errors: ErrorMap = [("email", "invalid format"), ("password", "min length 6")]
            .into_iter()
            .collect();
        assert_eq!(
            render(&SubmitOutcome::Invalid(errors)),
            Some(json!({
                "form": "login",
                "status": "invalid",
                "errors": {"email": "invalid format", "password": "min length 6"}
            }))
        );
    }

    #[test]
    fn submitted_carries_success_notice() {
        assert_eq!(
            render(&SubmitOutcome::Submitted(SubmissionResult::Completed)),
            Some(json!({
                "form": "login",
                "status": "submitted",
                "notice": {"kind": "success", "title": "Success", "message": "Signed in."}
            }))
        );
    }

    #[test]
    fn failed_carries_generic_notice() {
        let notice = Notice::error("Error", "There was an error signing in.");
        assert_eq!(
            render(&SubmitOutcome::Submitted(SubmissionResult::Failed(notice))),
            Some(json!({
                "form": "login",
                "status": "failed",
                "notice": {"kind": "error", "title": "Error", "message": "There was an error signing in."}
            }))
        );
    }

    #[test]
    fn write_to_ends_with_newline() {
        let success = Notice::success("Success", "Signed in.");
        let mut out = Vec::new();
        let written = Report::new("login", &SubmitOutcome::Busy, &success).write_to(&mut out);
        assert!(written.is_ok());
        let text = String::from_utf8(out).unwrap_or_default();
        assert!(text.ends_with("}\n"));
        assert_eq!(
            serde_json::from_str::<Value>(&text).ok(),
            Some(json!({"form": "login", "status": "busy"}))
        );
    }

    #[test]
    fn busy_has_status_only() {
        assert_eq!(
            render(&SubmitOutcome::Busy),
            Some(json!({"form": "login", "status": "busy"}))
        );
    }
}
