//! Ingestion-side error types

use thiserror::Error;

/// Result type alias for ingestion operations
pub type IngestResult<T> = std::result::Result<T, IngestError>;

/// Errors from the consumer and storage layers.
///
/// `Parse` and `Database` are batch-fatal: the transaction rolls back,
/// nothing is acknowledged, and the queue redelivers the whole batch.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Queue error: {0}")]
    Queue(String),

    #[error("Message parse failed: {0}")]
    Parse(String),

    #[error("Weight value {0} outside plausible bounds (0, 300)")]
    ImplausibleWeight(f64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
