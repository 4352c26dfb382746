//! Request validation helpers for the users endpoints.
//!
//! Turns raw request bodies and path segments into validated domain values,
//! reporting failures as `invalid_request` (or `not_found` for unusable ids)
//! with `details.field` and `details.code`.

use actix_web::HttpRequest;
use actix_web::error::JsonPayloadError;
use serde_json::json;

use crate::domain::{
    EmailAddress, Error, NewUser, PersonName, PhoneNumber, UserField, UserId, UserPatch,
    UserValidationError,
};

use super::users::UserPayload;

const MISSING_FIELD: &str = "missing_field";
const INVALID_JSON: &str = "invalid_json";

pub(crate) fn missing_field_error(field: UserField) -> Error {
    Error::invalid_field(field.required_message(), field.as_str(), MISSING_FIELD)
}

pub(crate) fn map_user_validation_error(error: UserValidationError) -> Error {
    match error.field() {
        Some(field) => Error::invalid_field(error.to_string(), field.as_str(), error.code()),
        None => Error::invalid_request(error.to_string()).with_details(json!({ "code": error.code() })),
    }
}

/// Check presence, then the value rule, for one field.
fn parse_field<T>(
    value: Option<String>,
    field: UserField,
    parse: impl FnOnce(String) -> Result<T, UserValidationError>,
) -> Result<T, Error> {
    let raw = value.ok_or_else(|| missing_field_error(field))?;
    parse(raw).map_err(map_user_validation_error)
}

/// Validate a creation body. Each field is checked in full before the next,
/// in display order, so the first failing field is reported.
pub(crate) fn new_user_from_payload(payload: UserPayload) -> Result<NewUser, Error> {
    let UserPayload {
        first_name,
        last_name,
        phone,
        email,
    } = payload;
    Ok(NewUser {
        first_name: parse_field(first_name, UserField::FirstName, PersonName::first)?,
        last_name: parse_field(last_name, UserField::LastName, PersonName::last)?,
        phone: parse_field(phone, UserField::Phone, PhoneNumber::new)?,
        email: parse_field(email, UserField::Email, EmailAddress::new)?,
    })
}

fn build_patch(payload: UserPayload) -> Result<UserPatch, UserValidationError> {
    Ok(UserPatch {
        first_name: payload.first_name.map(PersonName::first).transpose()?,
        last_name: payload.last_name.map(PersonName::last).transpose()?,
        phone: payload.phone.map(PhoneNumber::new).transpose()?,
        email: payload.email.map(EmailAddress::new).transpose()?,
    })
}

/// Validate a partial update body; absent or `null` fields are left alone.
pub(crate) fn patch_from_payload(payload: UserPayload) -> Result<UserPatch, Error> {
    build_patch(payload).map_err(map_user_validation_error)
}

/// Parse a path id. A malformed id cannot name a stored record, so it is
/// reported as not found.
pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|_| {
        Error::user_not_found(raw).with_details(json!({ "field": "id", "code": "invalid_id" }))
    })
}

/// `JsonConfig` error handler producing the standard error envelope.
pub fn json_error_handler(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request("Request body must be a valid JSON object")
        .with_details(json!({ "code": INVALID_JSON, "reason": error.to_string() }))
        .into()
}
