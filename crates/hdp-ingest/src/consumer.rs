//! Batch ingestion consumer
//!
//! One batch invocation maps to one transaction on one pooled connection:
//!
//! 1. parse every delivery body up front (fail fast, before any write),
//! 2. upsert every record inside the transaction,
//! 3. commit once,
//! 4. only then acknowledge each message.
//!
//! A parse, write, or commit failure aborts the whole batch with nothing
//! acknowledged; the queue redelivers and the upserts absorb the replay.
//! An acknowledgment failure after commit is logged and tolerated for the
//! same reason.

use sqlx::PgPool;
use tracing::{info, warn};

use crate::error::{IngestError, IngestResult};
use crate::queue::{Delivery, SqsQueue};
use crate::storage;
use hdp_common::types::{WeightMessage, WeightRecord};

/// Outcome of one successfully committed batch
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOutcome {
    /// Records written and committed
    pub applied: usize,
    /// Messages deleted from the queue (may trail `applied` when an ack fails)
    pub acknowledged: usize,
}

/// Queue-to-store consumer
pub struct IngestionConsumer {
    pool: PgPool,
    queue: SqsQueue,
}

impl IngestionConsumer {
    pub fn new(pool: PgPool, queue: SqsQueue) -> Self {
        Self { pool, queue }
    }

    /// Parse every delivery body into a record, in delivery order.
    ///
    /// Any malformed body fails the whole batch before a single write.
    pub fn parse_batch(deliveries: &[Delivery]) -> IngestResult<Vec<WeightRecord>> {
        deliveries
            .iter()
            .map(|delivery| {
                let message: WeightMessage =
                    serde_json::from_str(&delivery.body).map_err(|e| {
                        IngestError::Parse(format!(
                            "message {}: invalid body: {}",
                            delivery.message_id, e
                        ))
                    })?;

                WeightRecord::try_from(message).map_err(|e| {
                    IngestError::Parse(format!("message {}: {}", delivery.message_id, e))
                })
            })
            .collect()
    }

    /// Apply one delivered batch transactionally, then acknowledge
    pub async fn process_batch(&self, deliveries: Vec<Delivery>) -> IngestResult<BatchOutcome> {
        if deliveries.is_empty() {
            return Ok(BatchOutcome::default());
        }

        let records = Self::parse_batch(&deliveries)?;

        let mut tx = self.pool.begin().await?;
        for record in &records {
            storage::upsert_weight(&mut tx, record).await?;
        }
        tx.commit().await?;

        let mut acknowledged = 0;
        for delivery in &deliveries {
            match self.queue.delete(&delivery.receipt_handle).await {
                Ok(()) => acknowledged += 1,
                // Committed but unacknowledged: the redelivery hits the
                // upsert and changes nothing
                Err(e) => warn!(
                    message_id = %delivery.message_id,
                    error = %e,
                    "Acknowledgment failed, message will be redelivered"
                ),
            }
        }

        info!(
            applied = records.len(),
            acknowledged,
            "Batch committed"
        );

        Ok(BatchOutcome {
            applied: records.len(),
            acknowledged,
        })
    }

    /// Receive one batch from the queue and process it
    pub async fn poll_once(&self) -> IngestResult<BatchOutcome> {
        let deliveries = self.queue.receive().await?;
        self.process_batch(deliveries).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn delivery(id: &str, body: &str) -> Delivery {
        Delivery {
            message_id: id.to_string(),
            body: body.to_string(),
            receipt_handle: format!("rh-{id}"),
        }
    }

    #[test]
    fn test_parse_batch_in_delivery_order() {
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

        let records = IngestionConsumer::parse_batch(&deliveries).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 6, 5).unwrap());
        assert_eq!(records[1].value, 179.8);
    }

    #[test]
    fn test_parse_batch_fails_fast_on_any_bad_body() {
        let deliveries = vec![
            delivery(
                "m1",
                r#"{"id":"20240605","value":180.2,"timestamp":"2024-06-05T12:30:00Z"}"#,
            ),
            delivery("m2", "not json"),
            delivery(
                "m3",
                r#"{"id":"20240607","value":179.5,"timestamp":"2024-06-07T12:30:00Z"}"#,
            ),
        ];

        let err = IngestionConsumer::parse_batch(&deliveries).unwrap_err();

        assert!(matches!(err, IngestError::Parse(_)));
        assert!(err.to_string().contains("m2"));
    }

    #[test]
    fn test_parse_batch_rejects_bad_date_key() {
        let deliveries = vec![delivery(
            "m1",
            r#"{"id":"06/05/2024","value":180.2,"timestamp":"2024-06-05T12:30:00Z"}"#,
        )];

        assert!(matches!(
            IngestionConsumer::parse_batch(&deliveries),
            Err(IngestError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_batch_empty_is_empty() {
        let records = IngestionConsumer::parse_batch(&[]).unwrap();
        assert!(records.is_empty());
    }
}
