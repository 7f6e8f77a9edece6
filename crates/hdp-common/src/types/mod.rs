//! Common types used across HDP

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HdpError;

/// Date key format used for queue message ids ("YYYYMMDD")
pub const DATE_KEY_FORMAT: &str = "%Y%m%d";

/// Physical plausibility bounds for a weight value, exclusive on both ends.
///
/// Mirrored by the CHECK constraint on the weight table; validated in Rust
/// before the write so a bad record fails its batch with a typed error
/// instead of a raw constraint violation.
pub const WEIGHT_MIN_EXCLUSIVE: f64 = 0.0;
pub const WEIGHT_MAX_EXCLUSIVE: f64 = 300.0;

/// A normalized body-weight observation, unique per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRecord {
    pub date: NaiveDate,
    pub value: f64,
    pub observed_at: DateTime<Utc>,
}

impl WeightRecord {
    /// The record's natural key, as used for queue message ids
    pub fn date_key(&self) -> String {
        self.date.format(DATE_KEY_FORMAT).to_string()
    }
}

/// A single diet log entry. Natural key is (date, time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietEntry {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub raw_description: String,
}

/// Wire format of a queued weight message.
///
/// `id` is the date key (`YYYYMMDD`); the consumer derives the record date
/// from it. Owned by the queue until acknowledged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightMessage {
    pub id: String,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

impl WeightMessage {
    pub fn new(id: impl Into<String>, value: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            value,
            timestamp,
        }
    }
}

impl TryFrom<WeightMessage> for WeightRecord {
    type Error = HdpError;

    fn try_from(message: WeightMessage) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(&message.id, DATE_KEY_FORMAT).map_err(|e| {
            HdpError::Parse(format!("invalid date key '{}': {}", message.id, e))
        })?;

        Ok(Self {
            date,
            value: message.value,
            observed_at: message.timestamp,
        })
    }
}
