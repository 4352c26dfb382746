//! Driving port for user record use cases.
//!
//! Inbound adapters call this port with already-validated payloads and
//! receive the transport-agnostic [`Error`] on failure.

use async_trait::async_trait;

use crate::domain::{Error, NewUser, User, UserId, UserPatch};

/// Create, list, update, and delete user records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRecords: Send + Sync {
    /// List every stored record.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// Create a record from a validated payload.
    async fn create_user(&self, user: NewUser) -> Result<User, Error>;

    /// Apply a partial update to an existing record.
    async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<User, Error>;

    /// Hard-delete a record.
    async fn delete_user(&self, id: UserId) -> Result<(), Error>;
}
