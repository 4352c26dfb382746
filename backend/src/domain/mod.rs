//! Domain primitives, services, and ports.
//!
//! Purpose: define the validated user record types used by the HTTP and
//! persistence layers, the transport-agnostic error envelope, and the
//! ports adapters implement.
//!
//! Public surface:
//! - Error / ErrorCode: error payload and stable identifier.
//! - User, NewUser, UserPatch: the record aggregate and its write payloads.
//! - UserRecordsService: the driving-port implementation.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_records_service;

pub use self::error::{Error, ErrorCode, ErrorDecodeError, TRACE_ID_HEADER};
pub use self::trace_id::TraceId;
pub use self::user::{
    EmailAddress, NewUser, PersonName, PhoneNumber, User, UserField, UserId, UserPatch,
    UserValidationError,
};
pub use self::user_records_service::UserRecordsService;
