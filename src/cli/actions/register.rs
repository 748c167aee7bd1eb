use crate::cli::actions::{collaborator::Collaborator, report::Report};
use crate::cli::commands::submission;
use crate::forms::{RegisterForm, SubmitOutcome, register as form};
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};

#[derive(Debug)]
pub struct Args {
    pub username: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub submission: submission::Options,
}

/// Fill in the registration form and submit it to the collaborator.
///
/// # Errors
/// Returns an error if the form cannot be built.
pub async fn submit(args: Args) -> Result<SubmitOutcome> {
    let controller = form::controller(args.submission.timeout)?;

    for (field, value) in [
        ("username", args.username.as_str()),
        ("email", args.email.as_str()),
        ("password", args.password.expose_secret()),
        ("confirmPassword", args.confirm_password.expose_secret()),
    ] {
        controller.set_field_value(field, value)?;
        controller.set_field_touched(field)?;
    }

    let collaborator = Collaborator::new(&args.submission);
    Ok(controller
        .submit(|record| async move {
            let account: RegisterForm = record.into_model()?;
            collaborator.accept(form::FORM_NAME, &account.email).await
        })
        .await)
}

/// Submit the registration form and print the report on stdout.
///
/// # Errors
/// Returns an error if the form cannot be built or the report cannot be written.
pub async fn execute(args: Args) -> Result<()> {
    let outcome = submit(args).await?;
    Report::new(form::FORM_NAME, &outcome, &form::success_notice())
        .write_to(&mut std::io::stdout().lock())
}
