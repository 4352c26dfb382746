//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Email uniqueness comes from the `users_email_key` index; a unique
//! violation surfaces as [`UserPersistenceError::DuplicateEmail`]. Updates
//! and deletes that touch zero rows surface as
//! [`UserPersistenceError::NotFound`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NewUser, User, UserId, UserPatch};

use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map Diesel errors; `email` names the address involved in a unique violation.
fn map_diesel_error(error: DieselError, email: Option<&str>) -> UserPersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserPersistenceError::duplicate_email(email.unwrap_or("<unknown>"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::QueryBuilderError(_) => UserPersistenceError::query("database query error"),
        _ => UserPersistenceError::query("database error"),
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let UserRow {
        id,
        first_name,
        last_name,
        phone,
        email,
        created_at,
        updated_at,
    } = row;
    User::try_from_parts(
        id,
        [&first_name, &last_name, &phone, &email],
        created_at,
        updated_at,
    )
    .map_err(|err| UserPersistenceError::query(format!("stored user {id} is invalid: {err}")))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await?;

        let row = NewUserRow {
            id: Uuid::new_v4(),
            first_name: user.first_name.as_ref(),
            last_name: user.last_name.as_ref(),
            phone: user.phone.as_ref(),
            email: user.email.as_ref(),
        };

        let stored: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(user.email.as_ref())))?;

        row_to_user(stored)
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await?;

        let rows: Vec<UserRow> = users::table
            .order((users::created_at.asc(), users::id.asc()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;

        rows.into_iter().map(row_to_user).collect()
    }

    async fn update_by_id(&self, id: UserId, patch: UserPatch) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await?;

        let changeset = UserChangeset {
            first_name: patch.first_name.as_ref().map(AsRef::as_ref),
            last_name: patch.last_name.as_ref().map(AsRef::as_ref),
            phone: patch.phone.as_ref().map(AsRef::as_ref),
            email: patch.email.as_ref().map(AsRef::as_ref),
        };

        let updated: Option<UserRow> = diesel::update(users::table.find(id.as_uuid()))
            .set((&changeset, users::updated_at.eq(diesel::dsl::now)))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, changeset.email))?;

        match updated {
            Some(row) => row_to_user(row),
            None => Err(UserPersistenceError::not_found(id.to_string())),
        }
    }

    async fn delete_by_id(&self, id: UserId) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(users::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;

        if deleted == 0 {
            return Err(UserPersistenceError::not_found(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use diesel::result::DatabaseErrorInformation;
    use rstest::rstest;

    struct StubInfo;

    impl DatabaseErrorInformation for StubInfo {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint \"users_email_key\""
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            Some("users")
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            Some("users_email_key")
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(StubInfo))
    }

    #[rstest]
    fn unique_violation_maps_to_duplicate_email() {
        let error = map_diesel_error(
            database_error(DatabaseErrorKind::UniqueViolation),
            Some("ann@ex.com"),
        );
        assert_eq!(error, UserPersistenceError::duplicate_email("ann@ex.com"));
    }

    #[rstest]
    fn closed_connection_maps_to_connection() {
        let error = map_diesel_error(database_error(DatabaseErrorKind::ClosedConnection), None);
        assert!(matches!(error, UserPersistenceError::Connection { .. }));
    }

    #[rstest]
    #[case(DieselError::NotFound)]
    #[case(DieselError::RollbackTransaction)]
    fn other_errors_map_to_query(#[case] error: DieselError) {
        let mapped = map_diesel_error(error, None);
        assert!(matches!(mapped, UserPersistenceError::Query { .. }));
    }

    #[rstest]
    fn invalid_rows_are_reported_as_query_errors() {
        let row = UserRow {
            id: Uuid::new_v4(),
            first_name: "Ann".to_owned(),
            last_name: "Lee".to_owned(),
            phone: "555".to_owned(),
            email: "ann@ex.com".to_owned(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let error = row_to_user(row).expect_err("short phone rejected");
        assert!(matches!(error, UserPersistenceError::Query { .. }));
    }
}
