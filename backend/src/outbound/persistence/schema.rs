//! Diesel table definitions mirroring `backend/migrations`.
//!
//! Keep in step with the SQL migrations; `diesel print-schema` against a
//! migrated database regenerates this file.

diesel::table! {
    /// User records. `email` carries a unique index.
    users (id) {
        id -> Uuid,
        first_name -> Varchar,
        last_name -> Varchar,
        phone -> Varchar,
        email -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
