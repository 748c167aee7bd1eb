use crate::cli::actions::{collaborator::Collaborator, report::Report};
use crate::cli::commands::submission;
use crate::forms::{LoginForm, SubmitOutcome, login as form};
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};

#[derive(Debug)]
pub struct Args {
    pub email: String,
    pub password: SecretString,
    pub submission: submission::Options,
}

/// Fill in the login form and submit it to the collaborator.
///
/// # Errors
/// Returns an error if the form cannot be built.
pub async fn submit(args: Args) -> Result<SubmitOutcome> {
    let controller = form::controller(args.submission.timeout)?;

    for (field, value) in [
        ("email", args.email.as_str()),
        ("password", args.password.expose_secret()),
    ] {
        controller.set_field_value(field, value)?;
        controller.set_field_touched(field)?;
    }

    let collaborator = Collaborator::new(&args.submission);
    Ok(controller
        .submit(|record| async move {
            let login: LoginForm = record.into_model()?;
            collaborator.accept(form::FORM_NAME, &login.email).await
        })
        .await)
}

/// Submit the login form and print the report on stdout.
///
/// # Errors
/// Returns an error if the form cannot be built or the report cannot be written.
pub async fn execute(args: Args) -> Result<()> {
    let outcome = submit(args).await?;
    Report::new(form::FORM_NAME, &outcome, &form::success_notice())
        .write_to(&mut std::io::stdout().lock())
}
