//! bb8 pool of async Diesel connections for the user record store.
//!
//! Checkout failures are reported as [`UserPersistenceError::Connection`],
//! so the repository can forward them with `?`.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use tracing::debug;

use crate::domain::ports::UserPersistenceError;

const DEFAULT_MAX_SIZE: u32 = 8;
const DEFAULT_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(10);

/// The pool could not be created.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to build connection pool: {0}")]
pub struct PoolBuildError(String);

/// Where to connect and how many connections to keep.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use records_backend::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://localhost/records")
///     .with_max_size(4)
///     .with_checkout_timeout(Duration::from_secs(2));
/// assert_eq!(config.max_size(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    checkout_timeout: Duration,
}

impl PoolConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: DEFAULT_MAX_SIZE,
            checkout_timeout: DEFAULT_CHECKOUT_TIMEOUT,
        }
    }

    /// Cap the number of open connections; zero is raised to one.
    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size.max(1);
        self
    }

    #[must_use]
    pub fn with_checkout_timeout(mut self, timeout: Duration) -> Self {
        self.checkout_timeout = timeout;
        self
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    pub fn checkout_timeout(&self) -> Duration {
        self.checkout_timeout
    }
}

/// Shared pool handed to [`super::DieselUserRepository`].
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Create the pool. Connections are opened lazily.
    ///
    /// # Errors
    ///
    /// Returns [`PoolBuildError`] when bb8 rejects the configuration.
    pub async fn new(config: &PoolConfig) -> Result<Self, PoolBuildError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.database_url());
        let inner = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.checkout_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolBuildError(err.to_string()))?;
        Ok(Self { inner })
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// Returns [`UserPersistenceError::Connection`] when none frees up
    /// within the checkout timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, UserPersistenceError> {
        self.inner.get().await.map_err(|err| {
            debug!(error = %err, "connection checkout failed");
            UserPersistenceError::connection(err.to_string())
        })
    }
}
