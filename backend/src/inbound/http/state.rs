//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and depend only on
//! driving ports, so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::UserRecords;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserRecords>,
}

impl HttpState {
    /// Construct state from the user records port.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use records_backend::domain::UserRecordsService;
    /// use records_backend::inbound::http::state::HttpState;
    /// use records_backend::outbound::memory::InMemoryUserRepository;
    ///
    /// let repository = Arc::new(InMemoryUserRepository::default());
    /// let state = HttpState::new(Arc::new(UserRecordsService::new(repository)));
    /// # let _ = state;
    /// ```
    pub fn new(users: Arc<dyn UserRecords>) -> Self {
        Self { users }
    }
}
