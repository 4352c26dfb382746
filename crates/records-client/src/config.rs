//! Client settings loaded via OrthoConfig.
//!
//! Shares the `RECORDS_` prefix with the server so one environment
//! configures both: `RECORDS_API_URL` wins when set, otherwise the client
//! targets `http://localhost:{RECORDS_PORT}`.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

/// Port the server listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 5000;
/// Request timeout applied unless `RECORDS_TIMEOUT_SECS` is set.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Settings locating the records API.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RECORDS")]
pub struct ClientSettings {
    /// Full base URL of the API, e.g. `https://records.example.org/`.
    pub api_url: Option<String>,
    /// Port of a local server, used when no base URL is given.
    #[ortho_config(default = 5000)]
    pub port: u16,
    /// Request timeout in seconds.
    #[ortho_config(default = 10)]
    pub timeout_secs: u64,
}

impl ClientSettings {
    /// Resolve the API base URL.
    ///
    /// # Errors
    ///
    /// Returns the parse error when `api_url` is not a valid URL.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        match self.api_url.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Url::parse(raw),
            _ => Url::parse(&format!("http://localhost:{}", self.port)),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
