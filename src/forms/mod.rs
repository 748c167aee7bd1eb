//! Schema-validated forms: declarative schemas, a validator, a controller that
//! tracks per-form state, and the submission handler that calls back into the
//! host application.

pub mod controller;
pub mod error;
pub mod login;
pub mod register;
pub mod schema;
pub mod submission;
pub mod validator;

pub use self::controller::{FormController, FormState, Phase, SubmitOutcome};
pub use self::error::FormError;
pub use self::login::LoginForm;
pub use self::register::RegisterForm;
pub use self::schema::{Check, CrossFieldCheck, FieldKind, FieldSpec, FormSchema, Rule};
pub use self::submission::{
    Notice, NoticeKind, SubmissionConfig, SubmissionHandler, SubmissionResult,
};
pub use self::validator::{ErrorMap, RawValues, ValidatedRecord, validate};
