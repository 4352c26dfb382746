//! `UserRepository` backed by a lock-guarded vector.
//!
//! Records keep insertion order. Email uniqueness and not-found semantics
//! match the PostgreSQL adapter, so the HTTP layer behaves identically on
//! either store.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, NewUser, User, UserId, UserPatch};

/// Volatile user store for development and tests.
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryUserRepository {
    /// Create an empty store stamping records with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            clock,
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

fn poisoned<T>(_: PoisonError<T>) -> UserPersistenceError {
    UserPersistenceError::query("in-memory user store lock poisoned")
}

fn email_taken(users: &[User], email: &EmailAddress, except: Option<UserId>) -> bool {
    users
        .iter()
        .any(|user| user.email() == email && Some(user.id()) != except)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, UserPersistenceError> {
        let mut users = self.users.write().map_err(poisoned)?;
        if email_taken(&users, &user.email, None) {
            return Err(UserPersistenceError::duplicate_email(user.email.as_ref()));
        }
        let created = User::from_new(UserId::random(), user, self.clock.utc());
        users.push(created.clone());
        Ok(created)
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.clone())
    }

    async fn update_by_id(&self, id: UserId, patch: UserPatch) -> Result<User, UserPersistenceError> {
        let mut users = self.users.write().map_err(poisoned)?;
        let current = users
            .iter()
            .find(|user| user.id() == id)
            .cloned()
            .ok_or_else(|| UserPersistenceError::not_found(id.to_string()))?;
        if let Some(email) = patch.email.as_ref() {
            if email_taken(&users, email, Some(id)) {
                return Err(UserPersistenceError::duplicate_email(email.as_ref()));
            }
        }
        let updated = current.apply(patch, self.clock.utc());
        if let Some(slot) = users.iter_mut().find(|user| user.id() == id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    async fn delete_by_id(&self, id: UserId) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().map_err(poisoned)?;
        let before = users.len();
        users.retain(|user| user.id() != id);
        if users.len() == before {
            return Err(UserPersistenceError::not_found(id.to_string()));
        }
        Ok(())
    }
}
