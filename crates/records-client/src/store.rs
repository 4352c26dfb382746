//! Client-side owner of the authoritative record list.
//!
//! Every operation clears the previous error before it starts and clears
//! `loading` when it ends. Create and update re-fetch the full list on
//! success; delete removes the record locally.

use tracing::{debug, warn};

use crate::record::{UserChanges, UserDraft, UserRecord};
use crate::service::{ApiError, UsersApi};

pub const FETCH_FAILED: &str = "Failed to fetch users. Please try again.";
pub const CREATE_FAILED: &str = "Failed to create user. Please try again.";
pub const UPDATE_FAILED: &str = "Failed to update user. Please try again.";
pub const DELETE_FAILED: &str = "Failed to delete user. Please try again.";

fn error_message(error: &ApiError, fallback: &str) -> String {
    error.server_message().unwrap_or(fallback).to_owned()
}

/// Record list, loading flag, and last error, plus the mutations on them.
#[derive(Debug)]
pub struct UserStore<A> {
    api: A,
    records: Vec<UserRecord>,
    loading: bool,
    error: Option<String>,
}

impl<A: UsersApi> UserStore<A> {
    /// Create an empty store without contacting the server.
    pub fn new(api: A) -> Self {
        Self {
            api,
            records: Vec::new(),
            loading: false,
            error: None,
        }
    }

    /// Create a store and load the current list once.
    pub async fn mount(api: A) -> Self {
        let mut store = Self::new(api);
        store.fetch().await;
        store
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the most recent failure, cleared when the next operation
    /// starts.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn fail(&mut self, error: &ApiError, fallback: &str) {
        warn!(%error, "user records operation failed");
        self.error = Some(error_message(error, fallback));
    }

    /// Replace the records with the server's list.
    pub async fn fetch(&mut self) {
        self.begin();
        match self.api.list_users().await {
            Ok(records) => {
                debug!(count = records.len(), "fetched users");
                self.records = records;
            }
            Err(error) => self.fail(&error, FETCH_FAILED),
        }
        self.loading = false;
    }

    /// Create a record, then re-fetch the list.
    ///
    /// # Errors
    ///
    /// Returns the service error after recording its message.
    pub async fn create(&mut self, draft: &UserDraft) -> Result<(), ApiError> {
        self.begin();
        let result = match self.api.create_user(draft).await {
            Ok(_) => {
                self.fetch().await;
                Ok(())
            }
            Err(error) => {
                self.fail(&error, CREATE_FAILED);
                Err(error)
            }
        };
        self.loading = false;
        result
    }

    /// Apply a partial update, then re-fetch the list.
    ///
    /// # Errors
    ///
    /// Returns the service error after recording its message.
    pub async fn update(&mut self, id: &str, changes: &UserChanges) -> Result<(), ApiError> {
        self.begin();
        let result = match self.api.update_user(id, changes).await {
            Ok(_) => {
                self.fetch().await;
                Ok(())
            }
            Err(error) => {
                self.fail(&error, UPDATE_FAILED);
                Err(error)
            }
        };
        self.loading = false;
        result
    }

    /// Delete a record and drop it from the local list without re-fetching.
    ///
    /// # Errors
    ///
    /// Returns the service error after recording its message.
    pub async fn delete(&mut self, id: &str) -> Result<(), ApiError> {
        self.begin();
        let result = match self.api.delete_user(id).await {
            Ok(()) => {
                self.records.retain(|record| record.id != id);
                Ok(())
            }
            Err(error) => {
                self.fail(&error, DELETE_FAILED);
                Err(error)
            }
        };
        self.loading = false;
        result
    }
}
