//! Client for the user records API.
//!
//! Layers, from the wire up:
//!
//! - [`service`]: one HTTP call per record operation ([`UsersApi`]).
//! - [`store`]: the authoritative record list with loading and error state.
//! - [`form`] and [`table`]: creation form and inline-editing table, both
//!   driven by the declarative field list in [`schema`].
//! - [`config`]: where the API lives.

pub mod config;
pub mod form;
pub mod record;
pub mod schema;
pub mod service;
pub mod store;
pub mod table;

pub use form::{SubmitOutcome, UserForm};
pub use record::{FieldName, UserChanges, UserDraft, UserRecord};
pub use service::{ApiError, HttpUsersApi, UsersApi};
pub use store::UserStore;
pub use table::UserTable;
