//! HDP Server Library
//!
//! HTTP service for the health-metrics extraction pipeline.
//!
//! # Overview
//!
//! The server owns the upstream half of the pipeline:
//!
//! - **Extraction**: typed clients for the Google Docs and Sheets REST APIs,
//!   the diet document scan, and the two-year weight merge
//! - **Publishing**: one SQS message per windowed weight record, best effort
//!   per message
//! - **API Endpoints**: `GET /weight`, `GET /diet`, `POST /weight/publish`
//! - **Configuration**: environment-based configuration management
//!
//! The downstream half (queue consumption and durable storage) lives in the
//! `hdp-ingest` crate; the two halves only share the queue and the wire
//! types in `hdp-common`.
//!
//! ## Framework Stack
//!
//! - **Axum**: web framework
//! - **Reqwest**: Google REST clients with typed serde responses
//! - **AWS SDK**: SQS publisher
//!
//! # Example
//!
//! ```no_run
//! use hdp_server::config::Config;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     println!("binding {}:{}", config.server.host, config.server.port);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod queue;

// Re-export commonly used types
pub use error::{AppError, ServerResult};
