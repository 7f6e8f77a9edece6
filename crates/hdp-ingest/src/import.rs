//! Direct diet-document import
//!
//! Parses a local export of the diet log (the same two line grammars the
//! server extracts remotely) and upserts the entries straight into the
//! store, bypassing the queue. Used for backfills and for documents that
//! predate the pipeline.

use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;
use tracing::info;

use crate::error::{IngestError, IngestResult};
use crate::storage;
use hdp_common::diet::{DietDocument, DocumentParser};
use hdp_common::types::DietEntry;

/// Date format of document date headers ("06/05/24")
const HEADER_DATE_FORMAT: &str = "%m/%d/%y";

/// Time format of document time entries ("8:30", "18:45")
const ENTRY_TIME_FORMAT: &str = "%H:%M";

/// Convert a parsed document into typed entries.
///
/// The parser keeps the literal strings from the document; the storage
/// boundary is where (date, time) becomes a real key, so a header or time
/// that fails to parse fails the whole import here.
pub fn document_to_entries(document: &DietDocument) -> IngestResult<Vec<DietEntry>> {
    let mut entries = Vec::new();

    for (header, times) in document {
        let date = NaiveDate::parse_from_str(header, HEADER_DATE_FORMAT)
            .map_err(|e| IngestError::Parse(format!("date header '{header}': {e}")))?;

        for (time_label, description) in times {
            let time = NaiveTime::parse_from_str(time_label, ENTRY_TIME_FORMAT)
                .map_err(|e| IngestError::Parse(format!("time '{time_label}': {e}")))?;

            entries.push(DietEntry {
                date,
                time,
                raw_description: description.clone(),
            });
        }
    }

    Ok(entries)
}

/// Import one document file transactionally; returns the entry count
pub async fn import_file(pool: &PgPool, path: &Path) -> IngestResult<usize> {
    let text = std::fs::read_to_string(path)?;

    let parser = DocumentParser::new()
        .map_err(|e| IngestError::Parse(format!("parser construction: {e}")))?;
    let document = parser.parse(text.lines());
    let entries = document_to_entries(&document)?;

    let mut tx = pool.begin().await?;
    for entry in &entries {
        storage::upsert_diet_entry(&mut tx, entry).await?;
    }
    tx.commit().await?;

    info!(
        path = %path.display(),
        entries = entries.len(),
        "Diet document imported"
    );

    Ok(entries.len())
}
