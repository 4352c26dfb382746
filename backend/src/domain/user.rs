//! User record data model.
//!
//! Value objects validate on construction, so a [`User`], [`NewUser`], or
//! [`UserPatch`] can never hold a blank name, a malformed phone number, or
//! an unnormalised email address.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Business fields of a user record, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    FirstName,
    LastName,
    Phone,
    Email,
}

impl UserField {
    /// Every business field in display order.
    pub const ALL: [Self; 4] = [Self::FirstName, Self::LastName, Self::Phone, Self::Email];

    /// The camelCase name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Phone => "phone",
            Self::Email => "email",
        }
    }

    /// Message reported when a required value is absent or blank.
    pub fn required_message(self) -> &'static str {
        match self {
            Self::FirstName => "First name is required",
            Self::LastName => "Last name is required",
            Self::Phone => "Phone number is required",
            Self::Email => "Email is required",
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors returned by the user value objects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("First name is required")]
    EmptyFirstName,
    #[error("Last name is required")]
    EmptyLastName,
    #[error("Phone number is required")]
    EmptyPhone,
    #[error("Please enter a valid 10-digit phone number")]
    InvalidPhone,
    #[error("Email is required")]
    EmptyEmail,
    #[error("Please enter a valid email")]
    InvalidEmail,
}

impl UserValidationError {
    /// Field the error refers to, if any.
    pub fn field(&self) -> Option<UserField> {
        match self {
            Self::InvalidId => None,
            Self::EmptyFirstName => Some(UserField::FirstName),
            Self::EmptyLastName => Some(UserField::LastName),
            Self::EmptyPhone | Self::InvalidPhone => Some(UserField::Phone),
            Self::EmptyEmail | Self::InvalidEmail => Some(UserField::Email),
        }
    }

    /// Stable snake_case code for structured error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::EmptyFirstName => "empty_first_name",
            Self::EmptyLastName => "empty_last_name",
            Self::EmptyPhone => "empty_phone",
            Self::InvalidPhone => "invalid_phone",
            Self::EmptyEmail => "empty_email",
            Self::InvalidEmail => "invalid_email",
        }
    }
}

/// Store-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a [`UserId`] from its hyphenated UUID form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A first or last name, stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    /// Validate a first name.
    pub fn first(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::parse(raw.as_ref(), UserValidationError::EmptyFirstName)
    }

    /// Validate a last name.
    pub fn last(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::parse(raw.as_ref(), UserValidationError::EmptyLastName)
    }

    fn parse(raw: &str, when_empty: UserValidationError) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(when_empty);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<PersonName> for String {
    fn from(value: PersonName) -> Self {
        value.0
    }
}

static PHONE_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn phone_regex() -> &'static Regex {
    PHONE_RE.get_or_init(|| {
        // ASCII digits only; `\d` would admit other Unicode decimal digits.
        Regex::new("^[0-9]{10}$")
            .unwrap_or_else(|error| panic!("phone regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^\S+@\S+\.\S+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Exactly ten ASCII decimal digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validate a phone number. The value is not trimmed.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyPhone);
        }
        if !phone_regex().is_match(&raw) {
            return Err(UserValidationError::InvalidPhone);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

/// Email address normalised to trimmed lowercase.
///
/// # Examples
/// ```
/// use records_backend::domain::EmailAddress;
///
/// let email = EmailAddress::new("  Ann@Ex.com ").expect("valid email");
/// assert_eq!(email.as_ref(), "ann@ex.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalise and validate an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Validated payload for creating a user; every business field is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub phone: PhoneNumber,
    pub email: EmailAddress,
}

impl NewUser {
    /// Validate raw field values in display order; the first failure wins.
    pub fn try_from_strings(
        first_name: impl AsRef<str>,
        last_name: impl AsRef<str>,
        phone: impl Into<String>,
        email: impl AsRef<str>,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            first_name: PersonName::first(first_name)?,
            last_name: PersonName::last(last_name)?,
            phone: PhoneNumber::new(phone)?,
            email: EmailAddress::new(email)?,
        })
    }
}

/// Partial update; `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub first_name: Option<PersonName>,
    pub last_name: Option<PersonName>,
    pub phone: Option<PhoneNumber>,
    pub email: Option<EmailAddress>,
}

impl UserPatch {
    /// True when the patch changes no business field.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
    }
}

/// Persisted user record.
///
/// ## Invariants
/// - `id` never changes after creation.
/// - `updated_at` is never earlier than `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    id: UserId,
    first_name: PersonName,
    last_name: PersonName,
    phone: PhoneNumber,
    email: EmailAddress,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Materialise a stored record from a creation payload.
    pub fn from_new(id: UserId, new_user: NewUser, created_at: DateTime<Utc>) -> Self {
        let NewUser {
            first_name,
            last_name,
            phone,
            email,
        } = new_user;
        Self {
            id,
            first_name,
            last_name,
            phone,
            email,
            created_at,
            updated_at: created_at,
        }
    }

    /// Rebuild a record from raw stored values, re-validating every field.
    pub fn try_from_parts(
        id: Uuid,
        fields: [&str; 4],
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, UserValidationError> {
        let [first_name, last_name, phone, email] = fields;
        let new_user = NewUser::try_from_strings(first_name, last_name, phone, email)?;
        let mut user = Self::from_new(UserId::from_uuid(id), new_user, created_at);
        user.updated_at = updated_at;
        Ok(user)
    }

    /// Merge `patch` over this record and stamp the update time.
    #[must_use]
    pub fn apply(mut self, patch: UserPatch, updated_at: DateTime<Utc>) -> Self {
        let UserPatch {
            first_name,
            last_name,
            phone,
            email,
        } = patch;
        if let Some(value) = first_name {
            self.first_name = value;
        }
        if let Some(value) = last_name {
            self.last_name = value;
        }
        if let Some(value) = phone {
            self.phone = value;
        }
        if let Some(value) = email {
            self.email = value;
        }
        self.updated_at = updated_at;
        self
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDto {
    id: String,
    first_name: String,
    last_name: String,
    phone: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        Self {
            id: value.id.to_string(),
            first_name: value.first_name.into(),
            last_name: value.last_name.into(),
            phone: value.phone.into(),
            email: value.email.into(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        let id = UserId::new(&value.id)?;
        Self::try_from_parts(
            *id.as_uuid(),
            [
                value.first_name.as_str(),
                value.last_name.as_str(),
                value.phone.as_str(),
                value.email.as_str(),
            ],
            value.created_at,
            value.updated_at,
        )
    }
}
