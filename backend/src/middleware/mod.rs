//! Request middleware.
//!
//! Cross-cutting request concerns: trace correlation and the open CORS policy.

pub mod cors;
pub mod trace;

pub use cors::OpenCors;
pub use trace::Trace;
