//! Stand-in for the external service a host application would hand the
//! validated record to (an auth API, a session store). It only logs, and can
//! be told to stall or reject so every submission path can be driven from the
//! command line.

use crate::cli::commands::submission::Options;
use anyhow::{Result, bail};
use std::time::Duration;
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy)]
pub struct Collaborator {
    reject: bool,
    latency: Duration,
}

impl Collaborator {
    #[must_use]
    pub const fn new(options: &Options) -> Self {
        Self {
            reject: options.simulate_failure,
            latency: options.simulate_latency,
        }
    }

    /// Accept a submission for `subject` (an email address).
    ///
    /// # Errors
    /// Returns an error when configured to reject.
    #[instrument(skip(self))]
    pub async fn accept(self, form: &str, subject: &str) -> Result<()> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.reject {
            bail!("{form} rejected by upstream (simulated)");
        }

        info!("{form} accepted");
        Ok(())
    }
}
