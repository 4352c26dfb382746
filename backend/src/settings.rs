//! Server settings loaded via OrthoConfig.
//!
//! Values come from `RECORDS_*` environment variables, an optional config
//! file, and command-line flags, in increasing order of precedence.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Port used when `RECORDS_PORT` is unset. The client defaults to it too.
pub const DEFAULT_PORT: u16 = 5000;
const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Settings controlling the HTTP listener and record store.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RECORDS")]
pub struct BackendSettings {
    /// Port to listen on.
    #[ortho_config(default = 5000)]
    pub port: u16,
    /// Address to bind; defaults to every interface.
    pub host: Option<IpAddr>,
    /// PostgreSQL connection string. Records are kept in memory when unset.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    pub db_pool_size: Option<u32>,
}

impl BackendSettings {
    /// Return the configured port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Return the socket address the server binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host.unwrap_or(DEFAULT_HOST), self.port())
    }

    /// Return the database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
