//! Client data service: one HTTP call per record operation.
//!
//! [`HttpUsersApi`] owns transport details only: URL building, JSON encoding,
//! status mapping, and decoding. It never retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::record::{UserChanges, UserDraft, UserRecord};

/// Failures surfaced by [`UsersApi`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("server responded with status {status}")]
    Status {
        status: u16,
        /// `message` field of the server's error envelope, when present.
        message: Option<String>,
    },
    /// The request never produced a response.
    #[error("request failed: {message}")]
    Transport { message: String },
    /// A success response carried an unexpected body.
    #[error("unexpected response body: {message}")]
    Decode { message: String },
}

impl ApiError {
    /// Message supplied by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            Self::Transport { .. } | Self::Decode { .. } => None,
        }
    }

    /// HTTP status for [`ApiError::Status`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Decode { .. } => None,
        }
    }
}

/// Remote operations on user records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// `GET /api/users`
    async fn list_users(&self) -> Result<Vec<UserRecord>, ApiError>;

    /// `POST /api/users`
    async fn create_user(&self, draft: &UserDraft) -> Result<UserRecord, ApiError>;

    /// `PUT /api/users/{id}`
    async fn update_user(&self, id: &str, changes: &UserChanges) -> Result<UserRecord, ApiError>;

    /// `DELETE /api/users/{id}`
    async fn delete_user(&self, id: &str) -> Result<(), ApiError>;
}

/// Reqwest-backed [`UsersApi`].
#[derive(Debug, Clone)]
pub struct HttpUsersApi {
    client: Client,
    users_url: Url,
}

impl HttpUsersApi {
    /// Build a service for the API served at `base_url`, e.g.
    /// `http://localhost:5000`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when `base_url` cannot carry a path or
    /// the reqwest client cannot be constructed.
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, ApiError> {
        let mut users_url = base_url.clone();
        users_url
            .path_segments_mut()
            .map_err(|()| ApiError::Transport {
                message: format!("{base_url} cannot be used as an API base URL"),
            })?
            .pop_if_empty()
            .extend(["api", "users"]);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(map_transport_error)?;
        Ok(Self { client, users_url })
    }

    /// Collection URL, `…/api/users`.
    pub fn users_url(&self) -> &Url {
        &self.users_url
    }

    fn user_url(&self, id: &str) -> Url {
        let mut url = self.users_url.clone();
        // The collection URL was built from path segments, so it can be a base.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        url
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    message: Option<String>,
}

fn map_transport_error(error: reqwest::Error) -> ApiError {
    ApiError::Transport {
        message: error.to_string(),
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .filter(|message| !message.is_empty());
    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

async fn read_body(response: Response) -> Result<Vec<u8>, ApiError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        debug!(status = status.as_u16(), "users API returned an error status");
        return Err(map_status_error(status, body.as_ref()));
    }
    Ok(body.to_vec())
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|error| ApiError::Decode {
        message: error.to_string(),
    })
}

#[async_trait]
impl UsersApi for HttpUsersApi {
    async fn list_users(&self) -> Result<Vec<UserRecord>, ApiError> {
        let response = self
            .client
            .get(self.users_url.clone())
            .send()
            .await
            .map_err(map_transport_error)?;
        decode(&read_body(response).await?)
    }

    async fn create_user(&self, draft: &UserDraft) -> Result<UserRecord, ApiError> {
        let response = self
            .client
            .post(self.users_url.clone())
            .json(draft)
            .send()
            .await
            .map_err(map_transport_error)?;
        decode(&read_body(response).await?)
    }

    async fn update_user(&self, id: &str, changes: &UserChanges) -> Result<UserRecord, ApiError> {
        let response = self
            .client
            .put(self.user_url(id))
            .json(changes)
            .send()
            .await
            .map_err(map_transport_error)?;
        decode(&read_body(response).await?)
    }

    async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.user_url(id))
            .send()
            .await
            .map_err(map_transport_error)?;
        read_body(response).await.map(drop)
    }
}
