//! Port abstraction for user record persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{NewUser, User, UserId, UserPatch};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Another record already uses the email address.
        DuplicateEmail { email: String } => "a user with email {email} already exists",
        /// No record carries the requested identifier.
        NotFound { id: String } => "user {id} was not found",
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Store of user records. Validation happens before any adapter is called.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new record and return it with its assigned id and timestamps.
    async fn insert(&self, user: NewUser) -> Result<User, UserPersistenceError>;

    /// Return every record in store order.
    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Merge `patch` into the record with `id` and return the updated record.
    async fn update_by_id(&self, id: UserId, patch: UserPatch) -> Result<User, UserPersistenceError>;

    /// Remove the record with `id`.
    async fn delete_by_id(&self, id: UserId) -> Result<(), UserPersistenceError>;
}
