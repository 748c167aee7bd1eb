//! Hands a validated record to the caller's completion callback.
//!
//! The handler owns the release of the controller's busy flag: the guard it
//! receives is dropped on every exit path, including a caller dropping the
//! submit future before the callback resolves. A rejection is
//! logged with its detail and reported upward only as a generic [`Notice`].

use crate::forms::{FormState, ValidatedRecord, controller::Phase};
use anyhow::anyhow;
use serde::Serialize;
use std::{borrow::Cow, cell::RefCell, future::Future, time::Duration};
use tracing::{error, info, instrument, warn};
use ulid::Ulid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// A message for the presentation layer to render (alert, toast, banner).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: Cow<'static, str>,
    pub message: Cow<'static, str>,
}

impl Notice {
    pub fn success(
        title: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(
        title: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    /// The completion callback resolved successfully.
    Completed,
    /// The callback rejected or timed out.
    Failed(Notice),
}

#[derive(Debug, Clone)]
pub struct SubmissionConfig {
    /// Upper bound on the completion callback. `None` waits forever.
    pub timeout: Option<Duration>,
    /// Notice returned for any rejection.
    pub failure_notice: Notice,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            failure_notice: Notice::error("Error", "Something went wrong. Please try again."),
        }
    }
}

/// Returns the form to [`Phase::Idle`] when dropped.
pub(crate) struct BusyGuard<'a> {
    state: &'a RefCell<FormState>,
}

impl<'a> BusyGuard<'a> {
    pub(crate) const fn new(state: &'a RefCell<FormState>) -> Self {
        Self { state }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        match self.state.try_borrow_mut() {
            Ok(mut state) => state.phase = Phase::Idle,
            Err(_) => warn!("form state borrowed on release, form left submitting"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SubmissionHandler {
    config: SubmissionConfig,
}

impl SubmissionHandler {
    #[must_use]
    pub const fn new(config: SubmissionConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &SubmissionConfig {
        &self.config
    }

    /// Run `on_success` with the record and release the busy flag afterwards.
    #[instrument(skip_all, fields(attempt = %Ulid::new()))]
    pub(crate) async fn handle<F, Fut>(
        &self,
        release: BusyGuard<'_>,
        record: ValidatedRecord,
        on_success: F,
    ) -> SubmissionResult
    where
        F: FnOnce(ValidatedRecord) -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        let outcome = match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, on_success(record))
                .await
                .unwrap_or_else(|_| {
                    Err(anyhow!(
                        "completion did not resolve within {}ms",
                        limit.as_millis()
                    ))
                }),
            None => on_success(record).await,
        };

        drop(release);

        match outcome {
            Ok(()) => {
                info!("submission completed");
                SubmissionResult::Completed
            }
            Err(err) => {
                error!("submission failed: {err:#}");
                SubmissionResult::Failed(self.config.failure_notice.clone())
            }
        }
    }
}
