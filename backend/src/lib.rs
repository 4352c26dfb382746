//! User records backend library.
//!
//! The crate is laid out as a small hexagon:
//!
//! - [`domain`]: validated user records, the transport-agnostic error type,
//!   and the ports adapters plug into.
//! - [`inbound`]: the actix-web REST adapter serving `/api/users`.
//! - [`outbound`]: persistence adapters (Diesel/PostgreSQL and in-memory).
//! - [`server`]: configuration and HTTP server assembly.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::{OpenCors, Trace};
