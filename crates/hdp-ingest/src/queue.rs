//! SQS consumer-side queue client
//!
//! Receive and delete only; the publish half lives in `hdp-server`. A
//! delivery is owned by the consumer until deleted; an undeleted message
//! becomes visible again after the queue's visibility timeout.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_sqs::Client;
use tracing::debug;

use crate::config::QueueSettings;
use crate::error::{IngestError, IngestResult};

/// One delivered message with its acknowledgment token
#[derive(Debug, Clone)]
pub struct Delivery {
    pub message_id: String,
    pub body: String,
    pub receipt_handle: String,
}

/// Consumer half of the queue protocol (receive/delete)
#[derive(Debug, Clone)]
pub struct SqsQueue {
    client: Client,
    queue_url: String,
    max_batch: i32,
    wait_time_secs: i32,
}

impl SqsQueue {
    pub async fn new(settings: &QueueSettings) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()));

        if let Some(ref endpoint) = settings.endpoint {
            loader = loader.endpoint_url(endpoint.as_str());
        }

        let shared_config = loader.load().await;

        Self {
            client: Client::new(&shared_config),
            queue_url: settings.queue_url.clone(),
            max_batch: settings.max_batch,
            wait_time_secs: settings.wait_time_secs,
        }
    }

    /// Long-poll one batch of deliveries
    pub async fn receive(&self) -> IngestResult<Vec<Delivery>> {
        let output = self
            .client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(self.max_batch)
            .wait_time_seconds(self.wait_time_secs)
            .send()
            .await
            .map_err(|e| IngestError::Queue(e.to_string()))?;

        let mut deliveries = Vec::new();
        for message in output.messages() {
            let receipt_handle = message
                .receipt_handle()
                .ok_or_else(|| IngestError::Queue("delivery missing receipt handle".to_string()))?;

            deliveries.push(Delivery {
                message_id: message.message_id().unwrap_or_default().to_string(),
                body: message.body().unwrap_or_default().to_string(),
                receipt_handle: receipt_handle.to_string(),
            });
        }

        debug!(count = deliveries.len(), "Received batch");
        Ok(deliveries)
    }

    /// Acknowledge one delivery (delete it from the queue)
    pub async fn delete(&self, receipt_handle: &str) -> IngestResult<()> {
        self.client
            .delete_message()
            .queue_url(&self.queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|e| IngestError::Queue(e.to_string()))?;

        Ok(())
    }
}
