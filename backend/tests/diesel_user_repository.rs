//! Integration tests for `DieselUserRepository` against embedded PostgreSQL.
//!
//! Each test provisions its own migrated database and drives the adapter
//! through the `UserRepository` port on a dedicated Tokio runtime.

#[path = "support/embedded_postgres.rs"]
mod embedded_postgres;

use embedded_postgres::{handle_cluster_setup_failure, migrated_database};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use records_backend::domain::ports::{UserPersistenceError, UserRepository};
use records_backend::domain::{EmailAddress, NewUser, PhoneNumber, UserId, UserPatch};
use records_backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

struct TestContext {
    runtime: Runtime,
    repository: DieselUserRepository,
    // Dropped last so the pool releases its connections first.
    _database: TemporaryDatabase,
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let database = migrated_database(&runtime)?;
    let config = PoolConfig::new(database.url()).with_max_size(2);
    let pool = runtime
        .block_on(DbPool::new(&config))
        .map_err(|err| err.to_string())?;
    Ok(TestContext {
        runtime,
        repository: DieselUserRepository::new(pool),
        _database: database,
    })
}

#[fixture]
fn diesel_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn ann() -> NewUser {
    NewUser::try_from_strings(" Ann ", "Lee", "5551234567", "Ann@Ex.com").expect("valid user")
}

fn bob() -> NewUser {
    NewUser::try_from_strings("Bob", "Ray", "5559876543", "bob@ex.com").expect("valid user")
}

#[rstest]
fn created_users_are_listed_normalised(diesel_context: Option<TestContext>) {
    let Some(ctx) = diesel_context else {
        eprintln!("SKIP-TEST-CLUSTER: created_users_are_listed_normalised skipped");
        return;
    };

    ctx.runtime.block_on(async {
        let created = ctx.repository.insert(ann()).await.expect("insert succeeds");
        let users = ctx.repository.list_all().await.expect("list succeeds");

        assert_eq!(users, vec![created.clone()]);
        assert_eq!(created.first_name().as_ref(), "Ann");
        assert_eq!(created.email().as_ref(), "ann@ex.com");
    });
}

#[rstest]
fn duplicate_email_violates_the_unique_index(diesel_context: Option<TestContext>) {
    let Some(ctx) = diesel_context else {
        eprintln!("SKIP-TEST-CLUSTER: duplicate_email_violates_the_unique_index skipped");
        return;
    };

    ctx.runtime.block_on(async {
        ctx.repository.insert(ann()).await.expect("first insert");
        let twin = NewUser::try_from_strings("Other", "Person", "5550000000", "ANN@ex.com")
            .expect("valid user");

        let error = ctx.repository.insert(twin).await.expect_err("duplicate rejected");

        assert_eq!(error, UserPersistenceError::duplicate_email("ann@ex.com"));
        assert_eq!(ctx.repository.list_all().await.expect("list").len(), 1);
    });
}

#[rstest]
fn updating_an_unknown_id_changes_nothing(diesel_context: Option<TestContext>) {
    let Some(ctx) = diesel_context else {
        eprintln!("SKIP-TEST-CLUSTER: updating_an_unknown_id_changes_nothing skipped");
        return;
    };

    ctx.runtime.block_on(async {
        ctx.repository.insert(ann()).await.expect("insert");
        let before = ctx.repository.list_all().await.expect("list");
        let patch = UserPatch {
            email: Some(EmailAddress::new("ann@ex.com").expect("valid email")),
            ..UserPatch::default()
        };

        let error = ctx
            .repository
            .update_by_id(UserId::random(), patch)
            .await
            .expect_err("unknown id");

        assert!(matches!(error, UserPersistenceError::NotFound { .. }));
        assert_eq!(ctx.repository.list_all().await.expect("list"), before);
    });
}

#[rstest]
fn partial_update_keeps_other_fields(diesel_context: Option<TestContext>) {
    let Some(ctx) = diesel_context else {
        eprintln!("SKIP-TEST-CLUSTER: partial_update_keeps_other_fields skipped");
        return;
    };

    ctx.runtime.block_on(async {
        let created = ctx.repository.insert(ann()).await.expect("insert");
        let patch = UserPatch {
            phone: Some(PhoneNumber::new("5550001111").expect("valid phone")),
            ..UserPatch::default()
        };

        let updated = ctx
            .repository
            .update_by_id(created.id(), patch)
            .await
            .expect("update succeeds");

        assert_eq!(updated.phone().as_ref(), "5550001111");
        assert_eq!(updated.first_name(), created.first_name());
        assert_eq!(updated.email(), created.email());
        assert_eq!(updated.created_at(), created.created_at());
        assert!(updated.updated_at() >= created.updated_at());
    });
}

#[rstest]
fn taking_another_users_email_is_rejected(diesel_context: Option<TestContext>) {
    let Some(ctx) = diesel_context else {
        eprintln!("SKIP-TEST-CLUSTER: taking_another_users_email_is_rejected skipped");
        return;
    };

    ctx.runtime.block_on(async {
        ctx.repository.insert(ann()).await.expect("insert ann");
        let bob = ctx.repository.insert(bob()).await.expect("insert bob");
        let patch = UserPatch {
            email: Some(EmailAddress::new("ann@ex.com").expect("valid email")),
            ..UserPatch::default()
        };

        let error = ctx
            .repository
            .update_by_id(bob.id(), patch)
            .await
            .expect_err("duplicate rejected");

        assert_eq!(error, UserPersistenceError::duplicate_email("ann@ex.com"));
    });
}

#[rstest]
fn deleted_users_cannot_be_deleted_twice(diesel_context: Option<TestContext>) {
    let Some(ctx) = diesel_context else {
        eprintln!("SKIP-TEST-CLUSTER: deleted_users_cannot_be_deleted_twice skipped");
        return;
    };

    ctx.runtime.block_on(async {
        let ann = ctx.repository.insert(ann()).await.expect("insert ann");
        let bob = ctx.repository.insert(bob()).await.expect("insert bob");

        ctx.repository.delete_by_id(ann.id()).await.expect("delete succeeds");
        let remaining = ctx.repository.list_all().await.expect("list");
        let second = ctx.repository.delete_by_id(ann.id()).await;

        assert_eq!(remaining, vec![bob]);
        assert!(matches!(second, Err(UserPersistenceError::NotFound { .. })));
    });
}
