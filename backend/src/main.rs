//! Backend entry-point: loads settings, prepares the record store, and
//! serves the REST API.

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use records_backend::inbound::http::health::HealthState;
use records_backend::server::{ServerConfig, create_server};
use records_backend::settings::BackendSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = BackendSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let config = ServerConfig::from(&settings);

    let health_state = web::Data::new(HealthState::new());
    let bound = create_server(health_state.clone(), config).await?;
    info!(addr = %bound.local_addr, "user records API listening");

    let result = bound.server.await;
    health_state.mark_unhealthy();
    result
}
