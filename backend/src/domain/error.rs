//! Error envelope returned by every user records operation.
//!
//! Carries a stable [`ErrorCode`], a human-readable message, the trace id
//! of the request that failed, and optional structured details such as
//! `{"field": "phone", "code": "invalid_phone"}`. Nothing here knows about
//! HTTP; the inbound adapter picks status codes.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;

use super::TraceId;
use super::ports::UserPersistenceError;

/// Header name used to echo the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed input, failed validation, or a duplicate email.
    InvalidRequest,
    /// No record carries the requested id.
    NotFound,
    /// The record store could not be reached.
    ServiceUnavailable,
    /// Anything else.
    InternalError,
}

impl ErrorCode {
    /// Message used when a caller supplies a blank one.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "Invalid request",
            Self::NotFound => "Not found",
            Self::ServiceUnavailable => "Service unavailable",
            Self::InternalError => "Internal server error",
        }
    }
}

/// Error envelope shared by every adapter.
///
/// The message is never blank: constructors substitute
/// [`ErrorCode::fallback_message`], and deserialisation rejects blank
/// messages.
///
/// # Examples
/// ```
/// use records_backend::domain::{Error, ErrorCode};
///
/// let err = Error::user_not_found("42");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "User 42 not found");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ErrorBody", into = "ErrorBody")]
pub struct Error {
    code: ErrorCode,
    message: String,
    trace_id: Option<TraceId>,
    details: Option<Value>,
}

/// Reasons a serialised envelope is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorDecodeError {
    #[error("error message must not be blank")]
    BlankMessage,
    #[error("trace id {0:?} is not a UUID")]
    InvalidTraceId(String),
}

impl Error {
    /// Build an error tagged with the trace id in scope, if any.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = code.fallback_message().to_owned();
        }
        Self {
            code,
            message,
            trace_id: TraceId::current(),
            details: None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn trace_id(&self) -> Option<TraceId> {
        self.trace_id
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    #[must_use]
    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Validation failure naming the offending field.
    ///
    /// # Examples
    /// ```
    /// use records_backend::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_field("Please enter a valid email", "email", "invalid_email");
    /// assert_eq!(err.details(), Some(&json!({ "field": "email", "code": "invalid_email" })));
    /// ```
    pub fn invalid_field(message: impl Into<String>, field: &str, code: &str) -> Self {
        Self::invalid_request(message).with_details(json!({ "field": field, "code": code }))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn user_not_found(id: impl fmt::Display) -> Self {
        Self::not_found(format!("User {id} not found"))
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

impl From<UserPersistenceError> for Error {
    fn from(error: UserPersistenceError) -> Self {
        match error {
            UserPersistenceError::DuplicateEmail { email } => Self::invalid_field(
                format!("A user with email {email} already exists"),
                "email",
                "duplicate_email",
            ),
            UserPersistenceError::NotFound { id } => Self::user_not_found(id),
            UserPersistenceError::Connection { message } => {
                warn!(%message, "user repository unavailable");
                Self::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                warn!(%message, "user repository query failed");
                Self::internal(format!("user repository error: {message}"))
            }
        }
    }
}

/// Wire form of [`Error`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    code: ErrorCode,
    message: String,
    #[serde(default, alias = "trace_id", skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorBody {
    fn from(error: Error) -> Self {
        Self {
            code: error.code,
            message: error.message,
            trace_id: error.trace_id.map(|id| id.to_string()),
            details: error.details,
        }
    }
}

impl TryFrom<ErrorBody> for Error {
    type Error = ErrorDecodeError;

    fn try_from(body: ErrorBody) -> Result<Self, Self::Error> {
        if body.message.trim().is_empty() {
            return Err(ErrorDecodeError::BlankMessage);
        }
        // A decoded envelope keeps its own trace id, never the ambient one.
        let trace_id = body
            .trace_id
            .map(|raw| raw.parse::<TraceId>().map_err(|_| ErrorDecodeError::InvalidTraceId(raw)))
            .transpose()?;
        Ok(Self {
            code: body.code,
            message: body.message,
            trace_id,
            details: body.details,
        })
    }
}
