//! Creation form state.
//!
//! Inputs are generated from [`USER_FIELDS`]. Submission validates every
//! field first and only calls the store when all pass.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::{Clock, DefaultClock};
use tracing::error;

use crate::record::{FieldName, UserDraft};
use crate::schema::{FieldErrors, InputType, USER_FIELDS, validate_draft};
use crate::service::UsersApi;
use crate::store::UserStore;

pub const SUCCESS_NOTICE: &str = "User added successfully!";
pub const SUBMIT_LABEL: &str = "Add User";
pub const SUBMITTING_LABEL: &str = "Saving...";
const NOTICE_SECONDS: i64 = 3;

/// Result of [`UserForm::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Client-side validation failed; no request was made.
    Invalid,
    /// The record was created and the form reset.
    Created,
    /// The server rejected the request; the store holds the message.
    Failed,
}

/// One rendered input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputView<'a> {
    pub name: FieldName,
    pub label: &'static str,
    pub input_type: InputType,
    pub required: bool,
    pub value: &'a str,
    pub error: Option<&'a str>,
}

/// Values, per-field errors, and submission state of the creation form.
pub struct UserForm {
    values: UserDraft,
    errors: FieldErrors,
    submitting: bool,
    notice_raised_at: Option<DateTime<Utc>>,
    clock: Arc<dyn Clock>,
}

impl Default for UserForm {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl UserForm {
    /// Create an empty form; `clock` times the success notice.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            values: UserDraft::default(),
            errors: FieldErrors::new(),
            submitting: false,
            notice_raised_at: None,
            clock,
        }
    }

    pub fn values(&self) -> &UserDraft {
        &self.values
    }

    pub fn error(&self, field: FieldName) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            SUBMITTING_LABEL
        } else {
            SUBMIT_LABEL
        }
    }

    /// The success notice while it is showing; it hides itself three
    /// seconds after being raised.
    pub fn success_notice(&self) -> Option<&'static str> {
        let raised_at = self.notice_raised_at?;
        (self.clock.utc() - raised_at < TimeDelta::seconds(NOTICE_SECONDS))
            .then_some(SUCCESS_NOTICE)
    }

    pub fn dismiss_notice(&mut self) {
        self.notice_raised_at = None;
    }

    /// Inputs in display order.
    pub fn inputs(&self) -> impl Iterator<Item = InputView<'_>> {
        USER_FIELDS.iter().map(|field| InputView {
            name: field.name,
            label: field.label,
            input_type: field.input_type,
            required: field.required,
            value: self.values.get(field.name),
            error: self.error(field.name),
        })
    }

    /// Set one value and clear that field's error.
    pub fn change(&mut self, field: FieldName, value: impl Into<String>) {
        self.values.set(field, value);
        self.errors.remove(&field);
    }

    /// Validate and, when every field passes, create the record.
    pub async fn submit<A: UsersApi>(&mut self, store: &mut UserStore<A>) -> SubmitOutcome {
        self.errors = validate_draft(&self.values);
        if !self.errors.is_empty() {
            return SubmitOutcome::Invalid;
        }

        self.submitting = true;
        let outcome = match store.create(&self.values).await {
            Ok(()) => {
                self.values = UserDraft::default();
                self.notice_raised_at = Some(self.clock.utc());
                SubmitOutcome::Created
            }
            Err(err) => {
                error!(error = %err, "failed to add user");
                SubmitOutcome::Failed
            }
        };
        self.submitting = false;
        outcome
    }
}
