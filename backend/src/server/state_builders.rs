//! Builders for the record store and the HTTP state wrapping it.

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use crate::domain::UserRecordsService;
use crate::domain::ports::UserRepository;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryUserRepository;
use crate::outbound::persistence::{DbPool, DieselUserRepository, run_migrations};

use super::ServerConfig;

/// Build the record store selected by `config`.
///
/// With a database configured, pending migrations run before the pool is
/// created. Without one, records live in process memory and are lost on
/// restart.
///
/// # Errors
/// Returns [`std::io::Error`] when migrations fail or the pool cannot be
/// built.
pub(crate) async fn build_user_repository(
    config: &ServerConfig,
) -> std::io::Result<Arc<dyn UserRepository>> {
    match config.database() {
        Some(pool_config) => {
            run_migrations(pool_config.database_url())
                .await
                .map_err(|err| std::io::Error::other(format!("database migration failed: {err}")))?;
            let pool = DbPool::new(pool_config)
                .await
                .map_err(|err| std::io::Error::other(format!("database pool failed: {err}")))?;
            info!(max_size = pool_config.max_size(), "using PostgreSQL record store");
            Ok(Arc::new(DieselUserRepository::new(pool)))
        }
        None => {
            warn!("no database URL configured; records are kept in memory");
            Ok(Arc::new(InMemoryUserRepository::default()))
        }
    }
}

/// Wrap a record store in the service and state handlers consume.
pub(crate) fn build_http_state(repository: Arc<dyn UserRepository>) -> web::Data<HttpState> {
    let service = UserRecordsService::new(repository);
    web::Data::new(HttpState::new(Arc::new(service)))
}
