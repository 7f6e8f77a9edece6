//! HDP Ingest Library
//!
//! Downstream half of the health-metrics pipeline: queue consumption and
//! durable storage.
//!
//! # Guarantees
//!
//! The queue delivers at least once, in no particular order, with no
//! built-in deduplication. The consumer turns that into
//! exactly-once-in-effect storage:
//!
//! - each batch is applied inside one transaction on one pooled connection,
//! - every write is an upsert on the record's natural key,
//! - messages are acknowledged only after the whole batch has committed.
//!
//! A failed batch is never partially visible and never acknowledged; the
//! queue's redelivery policy owns the retry.

pub mod config;
pub mod consumer;
pub mod error;
pub mod import;
pub mod queue;
pub mod storage;

// Re-export commonly used types
pub use error::{IngestError, IngestResult};
