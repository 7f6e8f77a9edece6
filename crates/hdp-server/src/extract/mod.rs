//! Extraction pipeline: remote documents -> normalized records
//!
//! The extraction stage is read-only against its sources. A failure anywhere
//! in a fetch or parse aborts that extraction with no partial output; the
//! caller retries the whole trigger.

pub mod docs;
pub mod google;
pub mod sheets;

use thiserror::Error;

pub use docs::DietExtractor;
pub use google::{GoogleClient, GoogleCredentials};
pub use sheets::SheetExtractor;

/// Extraction-stage errors. No durable side effect has happened when one of
/// these surfaces, so the whole trigger is safe to retry.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Google API request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid credentials blob: {0}")]
    Credentials(String),

    #[error("Sheet row {row}: {message}")]
    Row { row: usize, message: String },
}

impl ExtractError {
    /// Parse failure on one sheet row, identified by its spreadsheet row number
    pub fn row(row: usize, message: impl Into<String>) -> Self {
        Self::Row {
            row,
            message: message.into(),
        }
    }
}
