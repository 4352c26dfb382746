//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use crate::outbound::persistence::PoolConfig;
use crate::settings::BackendSettings;

/// Builder-style configuration for creating the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) database: Option<PoolConfig>,
}

impl ServerConfig {
    /// Construct a configuration that keeps records in memory.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            database: None,
        }
    }

    /// Persist records in PostgreSQL using the given pool settings.
    #[must_use]
    pub fn with_database(mut self, pool: PoolConfig) -> Self {
        self.database = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Return the pool settings when a database is configured.
    #[must_use]
    pub fn database(&self) -> Option<&PoolConfig> {
        self.database.as_ref()
    }
}

impl From<&BackendSettings> for ServerConfig {
    fn from(settings: &BackendSettings) -> Self {
        let config = Self::new(settings.bind_addr());
        let Some(url) = settings.database_url() else {
            return config;
        };
        let pool = PoolConfig::new(url);
        let pool = match settings.db_pool_size {
            Some(size) => pool.with_max_size(size),
            None => pool,
        };
        config.with_database(pool)
    }
}
