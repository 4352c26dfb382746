//! Declarative field schema shared by the form and the table.
//!
//! The descriptor list drives input rendering, column headers, and
//! client-side validation. A field fails when it is required and empty, or
//! when it declares a pattern and a non-empty value does not match it.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::record::{FieldName, UserDraft};

/// Kind of input used to edit a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Text,
    Tel,
    Email,
}

impl InputType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Tel => "tel",
            Self::Email => "email",
        }
    }
}

/// Value patterns a field may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPattern {
    /// Exactly ten ASCII digits.
    TenDigits,
    /// `local@domain.tld` without whitespace.
    Email,
}

static TEN_DIGITS: OnceLock<Regex> = OnceLock::new();
static EMAIL: OnceLock<Regex> = OnceLock::new();

fn compile(cell: &'static OnceLock<Regex>, source: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(source)
            .unwrap_or_else(|error| panic!("field pattern {source:?} failed to compile: {error}"))
    })
}

impl FieldPattern {
    /// Regular expression source.
    pub fn source(self) -> &'static str {
        match self {
            Self::TenDigits => r"^[0-9]{10}$",
            Self::Email => r"^[^\s@]+@[^\s@]+\.[^\s@]+$",
        }
    }

    pub fn is_match(self, value: &str) -> bool {
        let regex = match self {
            Self::TenDigits => compile(&TEN_DIGITS, self.source()),
            Self::Email => compile(&EMAIL, self.source()),
        };
        regex.is_match(value)
    }
}

/// Presentation and validation rules for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: FieldName,
    pub label: &'static str,
    pub input_type: InputType,
    pub required: bool,
    pub pattern: Option<FieldPattern>,
    pub help_text: Option<&'static str>,
}

impl FieldDescriptor {
    /// Validate one value; `None` means the value is acceptable.
    ///
    /// ```
    /// use records_client::schema::USER_FIELDS;
    ///
    /// let [_, last_name, phone, _] = USER_FIELDS;
    /// assert_eq!(last_name.validate("").as_deref(), Some("Last Name is required"));
    /// assert_eq!(phone.validate("555").as_deref(), Some("Enter 10-digit phone number"));
    /// assert!(phone.validate("5551234567").is_none());
    /// ```
    pub fn validate(&self, value: &str) -> Option<String> {
        if self.required && value.is_empty() {
            return Some(format!("{} is required", self.label));
        }
        match self.pattern {
            Some(pattern) if !value.is_empty() && !pattern.is_match(value) => Some(
                self.help_text
                    .map_or_else(|| format!("Invalid {}", self.label), str::to_owned),
            ),
            _ => None,
        }
    }
}

/// The user record fields in display order.
pub const USER_FIELDS: [FieldDescriptor; 4] = [
    FieldDescriptor {
        name: FieldName::FirstName,
        label: "First Name",
        input_type: InputType::Text,
        required: true,
        pattern: None,
        help_text: Some("Enter first name"),
    },
    FieldDescriptor {
        name: FieldName::LastName,
        label: "Last Name",
        input_type: InputType::Text,
        required: true,
        pattern: None,
        help_text: Some("Enter last name"),
    },
    FieldDescriptor {
        name: FieldName::Phone,
        label: "Phone Number",
        input_type: InputType::Tel,
        required: true,
        pattern: Some(FieldPattern::TenDigits),
        help_text: Some("Enter 10-digit phone number"),
    },
    FieldDescriptor {
        name: FieldName::Email,
        label: "Email Address",
        input_type: InputType::Email,
        required: true,
        pattern: Some(FieldPattern::Email),
        help_text: Some("Enter valid email"),
    },
];

/// Per-field error messages keyed by field.
pub type FieldErrors = BTreeMap<FieldName, String>;

/// Validate every field of `draft` independently.
pub fn validate_draft(draft: &UserDraft) -> FieldErrors {
    USER_FIELDS
        .iter()
        .filter_map(|field| {
            field
                .validate(draft.get(field.name))
                .map(|message| (field.name, message))
        })
        .collect()
}
