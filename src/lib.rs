//! # authforms
//!
//! Login and registration forms backed by declarative, schema-validated
//! fields.
//!
//! ## Pipeline
//!
//! 1. **Input:** the presentation layer feeds raw strings into a
//!    [`forms::FormController`] through `set_field_value` / `set_field_touched`.
//! 2. **Validation:** `submit` runs [`forms::validate`] against the form's
//!    [`forms::FormSchema`]. Validation is lazy: nothing is checked while the
//!    user types, only on submit.
//! 3. **Submission:** a passing record is moved into the caller's completion
//!    callback through the [`forms::SubmissionHandler`], which always releases
//!    the busy flag and turns a rejection into a generic [`forms::Notice`].
//!
//! The core performs no network calls and stores nothing. Values are handed to
//! the completion callback untouched (no trimming, no hashing).

pub mod cli;
pub mod forms;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
