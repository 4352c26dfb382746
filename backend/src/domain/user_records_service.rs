//! User records domain service.
//!
//! Implements the [`UserRecords`] driving port on top of a
//! [`UserRepository`]. Persistence failures become [`Error`] envelopes via
//! its `From<UserPersistenceError>` conversion.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{UserRecords, UserRepository};
use crate::domain::{Error, NewUser, User, UserId, UserPatch};

/// Service wiring the user records use cases to a repository.
#[derive(Clone)]
pub struct UserRecordsService<R: ?Sized> {
    repository: Arc<R>,
}

impl<R: ?Sized> UserRecordsService<R> {
    /// Create a service backed by `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> UserRecords for UserRecordsService<R>
where
    R: UserRepository + ?Sized,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        let users = self.repository.list_all().await?;
        debug!(count = users.len(), "listed users");
        Ok(users)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, Error> {
        let created = self.repository.insert(user).await?;
        info!(user_id = %created.id(), "user created");
        Ok(created)
    }

    async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<User, Error> {
        let updated = self.repository.update_by_id(id, patch).await?;
        info!(user_id = %id, "user updated");
        Ok(updated)
    }

    async fn delete_user(&self, id: UserId) -> Result<(), Error> {
        self.repository.delete_by_id(id).await?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}
