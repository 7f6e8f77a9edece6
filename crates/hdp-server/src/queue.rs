//! SQS weight publisher
//!
//! One message per (date key, value) pair. Sends are best effort per
//! message: a failed enqueue is logged and counted, never fatal for the
//! rest of the batch. The consumer's upsert discipline makes message order
//! and duplicates irrelevant.

use std::collections::BTreeMap;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_sqs::Client;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::QueueConfig;
use hdp_common::types::WeightMessage;

/// Aggregate outcome of one publish trigger
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PublishReport {
    pub published: usize,
    pub failed: usize,
}

/// Publisher half of the queue protocol (send only)
#[derive(Debug, Clone)]
pub struct QueuePublisher {
    client: Client,
    queue_url: String,
}

impl QueuePublisher {
    pub async fn new(config: &QueueConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let Some(ref endpoint) = config.endpoint {
            loader = loader.endpoint_url(endpoint.as_str());
        }

        let shared_config = loader.load().await;

        Self {
            client: Client::new(&shared_config),
            queue_url: config.queue_url.clone(),
        }
    }

    /// Enqueue one message per windowed weight record.
    ///
    /// Order is irrelevant; each message stands alone.
    pub async fn publish_weights(&self, window: &BTreeMap<String, f64>) -> PublishReport {
        let mut report = PublishReport::default();

        for (date_key, value) in window {
            let message = WeightMessage::new(date_key.clone(), *value, Utc::now());

            let body = match serde_json::to_string(&message) {
                Ok(body) => body,
                Err(e) => {
                    warn!(date_key, error = %e, "Failed to serialize weight message");
                    report.failed += 1;
                    continue;
                }
            };

            match self
                .client
                .send_message()
                .queue_url(&self.queue_url)
                .message_body(body)
                .send()
                .await
            {
                Ok(_) => report.published += 1,
                Err(e) => {
                    warn!(date_key, error = %e, "Failed to enqueue weight message");
                    report.failed += 1;
                }
            }
        }

        info!(
            published = report.published,
            failed = report.failed,
            "Publish trigger complete"
        );

        report
    }
}
