//! Postgres storage layer
//!
//! All writes are upserts on the record's natural key and run inside a
//! caller-owned transaction, so a batch either lands whole or not at all and
//! a redelivered message is a harmless overwrite.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::config::DbConfig;
use crate::error::{IngestError, IngestResult};
use hdp_common::types::{DietEntry, WeightRecord, WEIGHT_MAX_EXCLUSIVE, WEIGHT_MIN_EXCLUSIVE};

/// Create the connection pool for the consumer
pub async fn create_pool(config: &DbConfig) -> IngestResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .connect(&config.url)
        .await?;

    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Database connection pool created"
    );

    Ok(pool)
}

/// Enforce the physical plausibility bound, exclusive on both ends.
///
/// The schema carries the same CHECK constraint; checking here first turns a
/// bad record into a typed batch failure instead of a raw constraint error.
pub fn validate_weight(value: f64) -> IngestResult<()> {
    if value <= WEIGHT_MIN_EXCLUSIVE || value >= WEIGHT_MAX_EXCLUSIVE {
        return Err(IngestError::ImplausibleWeight(value));
    }
    Ok(())
}

/// Upsert one weight record, keyed on date (last write for a date wins)
pub async fn upsert_weight(
    tx: &mut Transaction<'_, Postgres>,
    record: &WeightRecord,
) -> IngestResult<()> {
    validate_weight(record.value)?;

    sqlx::query(
        r#"
        INSERT INTO weight (date, weight)
        VALUES ($1, $2)
        ON CONFLICT (date)
        DO UPDATE SET weight = EXCLUDED.weight
        "#,
    )
    .bind(record.date)
    .bind(record.value)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Upsert one diet entry, keyed on (date, time)
pub async fn upsert_diet_entry(
    tx: &mut Transaction<'_, Postgres>,
    entry: &DietEntry,
) -> IngestResult<()> {
    sqlx::query(
        r#"
        INSERT INTO diet (date, time, raw_description)
        VALUES ($1, $2, $3)
        ON CONFLICT (date, time)
        DO UPDATE SET raw_description = EXCLUDED.raw_description
        "#,
    )
    .bind(entry.date)
    .bind(entry.time)
    .bind(&entry.raw_description)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_bounds_are_exclusive() {
        assert!(validate_weight(0.0).is_err());
        assert!(validate_weight(300.0).is_err());
        assert!(validate_weight(-5.0).is_err());
        assert!(validate_weight(427.3).is_err());

        assert!(validate_weight(0.1).is_ok());
        assert!(validate_weight(299.9).is_ok());
        assert!(validate_weight(180.2).is_ok());
    }
}
