//! Error types for HDP

use thiserror::Error;

/// Result type alias for HDP operations
pub type Result<T> = std::result::Result<T, HdpError>;

/// Main error type for HDP
#[derive(Error, Debug)]
pub enum HdpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Publish incomplete: {published} sent, {failed} failed")]
    Publish { published: usize, failed: usize },

    #[error("Ingestion failed: {0}")]
    Ingestion(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Database error: {0}")]
    Database(String),
}
