use std::{str::FromStr, sync::Arc};

use pledge_board::{
    app_state::LedgerStoreType,
    domain::{
        LedgerStoreError, LifecycleError, MemberId, PledgeAmount, TaskId,
        TaskTitle,
    },
    get_postgres_pool,
    services::data_stores::PostgresLedgerStore,
    utils::constants::DATABASE_URL,
};
use secrecy::{ExposeSecret, Secret};
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    Connection, Executor, PgConnection, PgPool,
};
use test_context::{test_context, AsyncTestContext};
use uuid::Uuid;

use crate::helpers::{get_test_members, ALICE, BOB, CHARLIE};

/// A throwaway database per test. `DATABASE_URL` must point at the server,
/// without a database name.
struct PostgresStore {
    store: LedgerStoreType,
    pool: PgPool,
    tmp_db_name: String,
}

impl AsyncTestContext for PostgresStore {
    async fn setup() -> PostgresStore {
        let tmp_db_name = Uuid::new_v4().to_string();
        let pool = configure_postgresql(&tmp_db_name).await;
        let store: LedgerStoreType =
            Arc::new(PostgresLedgerStore::new(pool.clone()));
        store
            .seed_members(&get_test_members())
            .await
            .expect("Failed to seed members");

        PostgresStore {
            store,
            pool,
            tmp_db_name,
        }
    }

    async fn teardown(self) {
        self.pool.close().await;
        delete_database(&self.tmp_db_name).await;
    }
}

fn server_url() -> Secret<String> {
    DATABASE_URL
        .clone()
        .expect("DATABASE_URL must be set to run PostgreSQL tests")
}

async fn configure_postgresql(db_name: &str) -> PgPool {
    let server_url = server_url();

    let connection = PgPoolOptions::new()
        .connect(server_url.expose_secret())
        .await
        .expect("Failed to create Postgres connection pool.");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
        .await
        .expect("Failed to create database.");

    let url_with_db =
        Secret::new(format!("{}/{}", server_url.expose_secret(), db_name));
    let pool = get_postgres_pool(&url_with_db)
        .await
        .expect("Failed to create Postgres connection pool!");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to migrate the database");

    pool
}

async fn delete_database(db_name: &str) {
    let connection_options =
        PgConnectOptions::from_str(server_url().expose_secret())
            .expect("Failed to parse PostgreSQL connection string");
    let mut connection = PgConnection::connect_with(&connection_options)
        .await
        .expect("Failed to connect to Postgres");

    connection
        .execute(
            format!(
                r#"
                SELECT pg_terminate_backend(pg_stat_activity.pid)
                FROM pg_stat_activity
                WHERE pg_stat_activity.datname = '{}'
                  AND pid <> pg_backend_pid();
                "#,
                db_name
            )
            .as_str(),
        )
        .await
        .expect("Failed to terminate connections.");

    connection
        .execute(format!(r#"DROP DATABASE "{}";"#, db_name).as_str())
        .await
        .expect("Failed to drop the database.");
}

fn id(value: i64) -> MemberId {
    MemberId::parse(value).expect("valid member ID")
}

fn amount(value: i64) -> PledgeAmount {
    PledgeAmount::parse(value).expect("valid pledge amount")
}

async fn new_task(store: &LedgerStoreType, creator: i64) -> TaskId {
    let title = TaskTitle::parse("Water plants").expect("valid title");
    store
        .create_task(&title, &id(creator))
        .await
        .expect("Failed to create task")
        .id
}

async fn credits_of(store: &LedgerStoreType, member: i64) -> i64 {
    store
        .get_snapshot()
        .await
        .expect("Failed to get snapshot")
        .member(&id(member))
        .map(|member| member.credits.value_of())
        .expect("member should exist")
}

#[test_context(PostgresStore)]
#[tokio::test]
#[ignore = "requires a running PostgreSQL server"]
async fn should_seed_members_once(ctx: &mut PostgresStore) {
    ctx.store
        .seed_members(&get_test_members())
        .await
        .expect("Failed to reseed members");

    let snapshot = ctx.store.get_snapshot().await.expect("snapshot");
    assert_eq!(snapshot.members, get_test_members());
    assert!(snapshot.tasks.is_empty());
}

#[test_context(PostgresStore)]
#[tokio::test]
#[ignore = "requires a running PostgreSQL server"]
async fn should_run_full_lifecycle(ctx: &mut PostgresStore) {
    let store = &ctx.store;
    let task_id = new_task(store, ALICE).await;

    store
        .pledge(&task_id, &id(BOB), amount(20))
        .await
        .expect("Failed to pledge");
    store
        .approve(&task_id, &id(ALICE))
        .await
        .expect("Failed to approve");
    let receipt = store
        .complete(&task_id, &id(BOB))
        .await
        .expect("Failed to complete");

    assert_eq!(receipt.payout_from_pledge.value_of(), 10);
    assert_eq!(receipt.total_payout.value_of(), 20);
    assert_eq!(credits_of(store, BOB).await, 80);

    let snapshot = store.get_snapshot().await.expect("snapshot");
    let task = &snapshot.tasks[0];
    assert_eq!(task.pledged_credits.value_of(), 10);
    assert!(task.completed);
    assert_eq!(task.completed_by, Some(id(BOB)));
}

#[test_context(PostgresStore)]
#[tokio::test]
#[ignore = "requires a running PostgreSQL server"]
async fn should_roll_back_failed_operations(ctx: &mut PostgresStore) {
    let store = &ctx.store;
    let task_id = new_task(store, ALICE).await;

    assert_eq!(
        store.pledge(&task_id, &id(BOB), amount(81)).await,
        Err(LedgerStoreError::Lifecycle(LifecycleError::InsufficientCredits))
    );
    assert_eq!(
        store.approve(&task_id, &id(BOB)).await,
        Err(LedgerStoreError::Lifecycle(LifecycleError::Forbidden))
    );
    assert_eq!(
        store.complete(&task_id, &id(BOB)).await,
        Err(LedgerStoreError::Lifecycle(LifecycleError::NotApproved))
    );

    assert_eq!(credits_of(store, BOB).await, 80);
    let snapshot = store.get_snapshot().await.expect("snapshot");
    assert_eq!(snapshot.tasks[0].pledged_credits.value_of(), 0);
    assert!(!snapshot.tasks[0].approved);
}

#[test_context(PostgresStore)]
#[tokio::test]
#[ignore = "requires a running PostgreSQL server"]
async fn should_serialise_concurrent_completions(ctx: &mut PostgresStore) {
    let task_id = new_task(&ctx.store, ALICE).await;
    ctx.store
        .pledge(&task_id, &id(ALICE), amount(40))
        .await
        .expect("Failed to pledge");
    ctx.store
        .approve(&task_id, &id(ALICE))
        .await
        .expect("Failed to approve");

    let handles: Vec<_> = [BOB, CHARLIE, BOB, CHARLIE]
        .into_iter()
        .map(|member| {
            let store = ctx.store.clone();
            tokio::spawn(async move {
                let member_id = id(member);
                store.complete(&task_id, &member_id).await
            })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.await.expect("completion task panicked") {
            Ok(_) => successes += 1,
            Err(e) => assert_eq!(
                e,
                LedgerStoreError::Lifecycle(LifecycleError::InvalidTask)
            ),
        }
    }
    assert_eq!(successes, 1);
    assert_eq!(
        credits_of(&ctx.store, BOB).await + credits_of(&ctx.store, CHARLIE).await,
        220
    );
}
