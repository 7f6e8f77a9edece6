//! Storage and consumer tests against a containerized Postgres
//!
//! These exercise the real SQL path: the migration bootstrap, the upsert
//! semantics on the natural keys, and the all-or-nothing batch transaction.
//! They require Docker; run with:
//!
//! ```bash
//! cargo test -p hdp-ingest --test storage_integration_tests -- --ignored
//! ```

mod common;

use chrono::{NaiveDate, NaiveTime, Utc};
use common::{init_test_tracing, PostgresOptions, TestPostgres};

use hdp_common::types::{DietEntry, WeightRecord};
use hdp_ingest::config::QueueSettings;
use hdp_ingest::consumer::IngestionConsumer;
use hdp_ingest::queue::{Delivery, SqsQueue};
use hdp_ingest::storage;
use hdp_ingest::IngestError;

fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).expect("valid date")
}

fn weight_record(day: u32, value: f64) -> WeightRecord {
    WeightRecord {
        date: june(day),
        value,
        observed_at: Utc::now(),
    }
}

fn delivery(id: &str, body: &str) -> Delivery {
    Delivery {
        message_id: id.to_string(),
        body: body.to_string(),
        receipt_handle: format!("rh-{id}"),
    }
}

/// Queue client pointed at a dead endpoint.
///
/// `process_batch` only touches the queue to acknowledge after commit, so an
/// unreachable endpoint makes every acknowledgment fail without affecting
/// the storage path.
async fn unreachable_queue() -> SqsQueue {
    std::env::set_var("AWS_ACCESS_KEY_ID", "test");
    std::env::set_var("AWS_SECRET_ACCESS_KEY", "test");

    SqsQueue::new(&QueueSettings {
        queue_url: "http://127.0.0.1:9/000000000000/hdp-test".to_string(),
        region: "us-east-1".to_string(),
        endpoint: Some("http://127.0.0.1:9".to_string()),
        max_batch: 10,
        wait_time_secs: 1,
    })
    .await
}

async fn weight_row_count(pool: &sqlx::PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM weight")
        .fetch_one(pool)
        .await
        .expect("count query failed")
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_migrations_create_health_schema() {
    init_test_tracing();

    let pg = TestPostgres::start_with_options(PostgresOptions::without_migrations())
        .await
        .expect("Failed to start PostgreSQL container");
    let pool = pg.pool();

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .expect("Migrations failed");

    for table in ["weight", "diet"] {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM information_schema.tables WHERE table_name = $1)",
        )
        .bind(table)
        .fetch_one(pool)
        .await
        .expect("Failed to check table existence");

        assert!(exists, "Table '{table}' should exist after migrations");
    }

    // The plausibility bound is enforced by the schema itself
    let out_of_bounds = sqlx::query("INSERT INTO weight (date, weight) VALUES ($1, $2)")
        .bind(june(5))
        .bind(500.0_f64)
        .execute(pool)
        .await;

    assert!(out_of_bounds.is_err(), "CHECK constraint should reject 500");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_weight_upsert_same_date_keeps_one_row_with_latest_value() {
    init_test_tracing();

    let pg = TestPostgres::start()
        .await
        .expect("Failed to start PostgreSQL container");
    let pool = pg.pool();

    let mut tx = pool.begin().await.expect("begin failed");
    storage::upsert_weight(&mut tx, &weight_record(5, 180.2))
        .await
        .expect("first upsert failed");
    tx.commit().await.expect("commit failed");

    // Redelivery of the same date with a corrected value
    let mut tx = pool.begin().await.expect("begin failed");
    storage::upsert_weight(&mut tx, &weight_record(5, 179.6))
        .await
        .expect("second upsert failed");
    tx.commit().await.expect("commit failed");

    assert_eq!(weight_row_count(pool).await, 1);

    let stored: f64 = sqlx::query_scalar("SELECT weight FROM weight WHERE date = $1")
        .bind(june(5))
        .fetch_one(pool)
        .await
        .expect("select failed");

    assert!((stored - 179.6).abs() < f64::EPSILON);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_diet_upsert_same_slot_keeps_latest_description() {
    init_test_tracing();

    let pg = TestPostgres::start()
        .await
        .expect("Failed to start PostgreSQL container");
    let pool = pg.pool();

    let slot_time = NaiveTime::from_hms_opt(12, 15, 0).expect("valid time");
    let entry = |description: &str| DietEntry {
        date: june(5),
        time: slot_time,
        raw_description: description.to_string(),
    };

    let mut tx = pool.begin().await.expect("begin failed");
    storage::upsert_diet_entry(&mut tx, &entry("first draft"))
        .await
        .expect("first upsert failed");
    storage::upsert_diet_entry(&mut tx, &entry("corrected entry"))
        .await
        .expect("second upsert failed");
    tx.commit().await.expect("commit failed");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM diet")
        .fetch_one(pool)
        .await
        .expect("count query failed");
    assert_eq!(count, 1);

    let stored: String = sqlx::query_scalar("SELECT raw_description FROM diet WHERE date = $1")
        .bind(june(5))
        .fetch_one(pool)
        .await
        .expect("select failed");
    assert_eq!(stored, "corrected entry");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_failed_batch_writes_nothing_and_acknowledges_nothing() {
    init_test_tracing();

    let pg = TestPostgres::start()
        .await
        .expect("Failed to start PostgreSQL container");
    let consumer = IngestionConsumer::new(pg.pool().clone(), unreachable_queue().await);

    // The second body parses but fails the plausibility bound mid-batch
    let deliveries = vec![
        delivery(
            "m1",
            r#"{"id":"20240605","value":180.2,"timestamp":"2024-06-05T12:30:00Z"}"#,
        ),
        delivery(
            "m2",
            r#"{"id":"20240606","value":500.0,"timestamp":"2024-06-06T12:30:00Z"}"#,
        ),
    ];

    let err = consumer
        .process_batch(deliveries)
        .await
        .expect_err("batch with an implausible value must fail");
    assert!(matches!(err, IngestError::ImplausibleWeight(_)));

    // The first record's write must have rolled back with the rest
    assert_eq!(weight_row_count(pg.pool()).await, 0);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_committed_batch_tolerates_acknowledgment_failure() {
    init_test_tracing();

    let pg = TestPostgres::start()
        .await
        .expect("Failed to start PostgreSQL container");
    let consumer = IngestionConsumer::new(pg.pool().clone(), unreachable_queue().await);

    let deliveries = vec![
        delivery(
            "m1",
            r#"{"id":"20240605","value":180.2,"timestamp":"2024-06-05T12:30:00Z"}"#,
        ),
        delivery(
            "m2",
            r#"{"id":"20240606","value":179.8,"timestamp":"2024-06-06T12:30:00Z"}"#,
        ),
    ];

    // Every delete fails against the dead endpoint, but the batch is already
    // committed: the outcome reports the writes and zero acknowledgments
    let outcome = consumer
        .process_batch(deliveries)
        .await
        .expect("committed batch must not fail on acknowledgment");

    assert_eq!(outcome.applied, 2);
    assert_eq!(outcome.acknowledged, 0);
    assert_eq!(weight_row_count(pg.pool()).await, 2);
}
