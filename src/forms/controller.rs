//! Form controller: owns the per-form state and mediates between raw input
//! events and the validator.
//!
//! The controller is driven from a single logical thread. Its methods take
//! `&self` so several event handlers can hold it while a submission is
//! suspended; the in-flight `submitting` flag is the only guard against a
//! second submission, and a submit while busy is a no-op.
//!
//! Validation is lazy. Typing never validates on its own; a field's error is
//! only dropped on input when the whole record validates again.

use crate::forms::{
    ErrorMap, FieldSpec, FormError, FormSchema, RawValues, SubmissionConfig, SubmissionHandler,
    SubmissionResult, ValidatedRecord, submission::BusyGuard, validate,
};
use serde::Serialize;
use std::{cell::RefCell, collections::BTreeSet, fmt, future::Future};
use tracing::{debug, info, instrument, trace};

/// `Idle → Validating → {Idle, Submitting → Idle}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Validating,
    Submitting,
}

/// Snapshot of one mounted form.
#[derive(Clone, PartialEq, Eq)]
pub struct FormState {
    values: RawValues,
    touched: BTreeSet<String>,
    errors: ErrorMap,
    pub(crate) phase: Phase,
    submit_count: u32,
}

impl FormState {
    /// Every schema field starts as the empty string.
    pub(crate) fn new(schema: &FormSchema) -> Self {
        Self {
            values: schema
                .field_names()
                .map(|name| (name.to_string(), String::new()))
                .collect(),
            touched: BTreeSet::new(),
            errors: ErrorMap::new(),
            phase: Phase::Idle,
            submit_count: 0,
        }
    }

    #[must_use]
    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    #[must_use]
    pub const fn values(&self) -> &RawValues {
        &self.values
    }

    #[must_use]
    pub const fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    #[must_use]
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field)
    }

    #[must_use]
    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.contains(field)
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn submitting(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Number of accepted `submit` calls (busy no-ops are not counted).
    #[must_use]
    pub const fn submit_count(&self) -> u32 {
        self.submit_count
    }
}

// Values may be passwords; only field names are printed.
impl fmt::Debug for FormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormState")
            .field("fields", &self.values.keys().collect::<Vec<_>>())
            .field("touched", &self.touched)
            .field("errors", &self.errors)
            .field("phase", &self.phase)
            .field("submit_count", &self.submit_count)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A submission was already in flight; nothing changed.
    Busy,
    /// Validation failed; the errors are now in the form state.
    Invalid(ErrorMap),
    /// The record was handed to the completion callback.
    Submitted(SubmissionResult),
}

pub struct FormController {
    schema: FormSchema,
    state: RefCell<FormState>,
    handler: SubmissionHandler,
}

impl FormController {
    #[must_use]
    pub fn new(schema: FormSchema, config: SubmissionConfig) -> Self {
        let state = RefCell::new(FormState::new(&schema));
        Self {
            schema,
            state,
            handler: SubmissionHandler::new(config),
        }
    }

    #[must_use]
    pub const fn schema(&self) -> &FormSchema {
        &self.schema
    }

    #[must_use]
    pub const fn submission_config(&self) -> &SubmissionConfig {
        self.handler.config()
    }

    /// Current state. A copy, so it may be held across awaits.
    #[must_use]
    pub fn state(&self) -> FormState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn submitting(&self) -> bool {
        self.state.borrow().submitting()
    }

    fn ensure_field(&self, name: &str) -> Result<&FieldSpec, FormError> {
        self.schema
            .field(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    /// Replace the value of one field.
    ///
    /// The field's existing error is cleared only if the whole record now
    /// validates; nothing else is re-checked.
    ///
    /// # Errors
    /// Returns an error if the field is unknown or a submission is in flight.
    #[instrument(skip(self, value), fields(form = self.schema.name()))]
    pub fn set_field_value(&self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let spec = self.ensure_field(name)?;

        let mut state = self.state.borrow_mut();
        if state.submitting() {
            return Err(FormError::Busy);
        }

        let value = value.into();
        if spec.kind().is_secret() {
            trace!("value updated");
        } else {
            trace!(%value, "value updated");
        }
        state.values.insert(name.to_string(), value);

        if state.errors.contains(name) && validate(&self.schema, &state.values).is_ok() {
            state.errors.remove(name);
            debug!("error cleared, record validates");
        }

        Ok(())
    }

    /// Mark a field as touched (blurred at least once).
    ///
    /// # Errors
    /// Returns an error if the field is unknown.
    pub fn set_field_touched(&self, name: &str) -> Result<(), FormError> {
        self.ensure_field(name)?;
        self.state.borrow_mut().touched.insert(name.to_string());
        Ok(())
    }

    /// Restore the freshly mounted state.
    ///
    /// # Errors
    /// Returns an error if a submission is in flight.
    pub fn reset(&self) -> Result<(), FormError> {
        let mut state = self.state.borrow_mut();
        if state.submitting() {
            return Err(FormError::Busy);
        }
        *state = FormState::new(&self.schema);
        Ok(())
    }

    /// Validate the current values and, if they pass, hand the record to
    /// `on_success`.
    ///
    /// A call made while a submission is in flight returns
    /// [`SubmitOutcome::Busy`] without touching state or invoking the
    /// callback. Whatever happens, the form ends up idle and submittable again.
    #[instrument(skip_all, fields(form = self.schema.name()))]
    pub async fn submit<F, Fut>(&self, on_success: F) -> SubmitOutcome
    where
        F: FnOnce(ValidatedRecord) -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        let record = {
            let mut state = self.state.borrow_mut();
            if state.submitting() {
                debug!("submission in flight, ignoring submit");
                return SubmitOutcome::Busy;
            }

            state.phase = Phase::Validating;
            state.submit_count = state.submit_count.saturating_add(1);

            match validate(&self.schema, &state.values) {
                Ok(record) => {
                    state.errors = ErrorMap::new();
                    state.phase = Phase::Submitting;
                    record
                }
                Err(errors) => {
                    info!(invalid = errors.len(), "form rejected by validation");
                    state.errors = errors.clone();
                    state.phase = Phase::Idle;
                    return SubmitOutcome::Invalid(errors);
                }
            }
        };

        let release = BusyGuard::new(&self.state);
        let result = self.handler.handle(release, record, on_success).await;

        SubmitOutcome::Submitted(result)
    }
}
