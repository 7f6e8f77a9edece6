//! Weight sheet extractor
//!
//! The weight spreadsheet has one tab per year, rows 2..=367 of
//! `(date, ..unused.., value)`. Extraction builds a date -> value mapping per
//! year, merges the current and prior year for the read endpoint, and windows
//! to the trailing week for queue publishing.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use tracing::info;

use super::{google::GoogleClient, ExtractError};
use hdp_common::types::DATE_KEY_FORMAT;

/// Date format of the sheet's date column
pub const SHEET_DATE_FORMAT: &str = "%Y-%m-%d";

/// Publish window: dates strictly after `today - RECENT_WINDOW_DAYS`
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// A sheet row needs at least (date, _, value); shorter trailing rows are
/// ragged filler, not data
const MIN_ROW_CELLS: usize = 3;

/// The fetched range starts at spreadsheet row 2 (row 1 is the header)
const FIRST_DATA_ROW: usize = 2;

/// One parsed spreadsheet row
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub date: NaiveDate,
    pub value: f64,
}

/// Parse one row of string cells.
///
/// Rows with fewer than [`MIN_ROW_CELLS`] cells are dropped (`Ok(None)`);
/// a malformed date or value aborts the extraction with the offending
/// spreadsheet row number.
fn parse_row(row_number: usize, cells: &[String]) -> Result<Option<SheetRow>, ExtractError> {
    if cells.len() < MIN_ROW_CELLS {
        return Ok(None);
    }

    let date = NaiveDate::parse_from_str(&cells[0], SHEET_DATE_FORMAT)
        .map_err(|e| ExtractError::row(row_number, format!("invalid date '{}': {}", cells[0], e)))?;

    let value: f64 = cells[2]
        .parse()
        .map_err(|e| ExtractError::row(row_number, format!("invalid value '{}': {}", cells[2], e)))?;

    Ok(Some(SheetRow { date, value }))
}

/// Extractor over one weight spreadsheet
pub struct SheetExtractor<'a> {
    client: &'a GoogleClient,
    sheet_id: &'a str,
}

impl<'a> SheetExtractor<'a> {
    pub fn new(client: &'a GoogleClient, sheet_id: &'a str) -> Self {
        Self { client, sheet_id }
    }

    /// Extract the date -> weight mapping for one year tab
    pub async fn weights_for_year(
        &self,
        year: i32,
    ) -> Result<BTreeMap<NaiveDate, f64>, ExtractError> {
        let range = format!("{year}!R2C1:R367C3");
        let rows = self.client.fetch_values(self.sheet_id, &range).await?;

        let mut weights = BTreeMap::new();
        for (index, cells) in rows.iter().enumerate() {
            if let Some(row) = parse_row(FIRST_DATA_ROW + index, cells)? {
                weights.insert(row.date, row.value);
            }
        }

        info!(year, rows = weights.len(), "Extracted weight rows");
        Ok(weights)
    }

    /// Extract and merge the prior and current year.
    ///
    /// The current year is merged last, so it wins any date collision.
    pub async fn recent(&self, today: NaiveDate) -> Result<BTreeMap<NaiveDate, f64>, ExtractError> {
        let current_year = today.year();

        let mut merged = self.weights_for_year(current_year - 1).await?;
        merged.extend(self.weights_for_year(current_year).await?);

        Ok(merged)
    }
}

/// Window a weight mapping to dates strictly after `today - 7 days`,
/// re-keyed to the canonical `YYYYMMDD` queue key.
pub fn publish_window(
    weights: &BTreeMap<NaiveDate, f64>,
    today: NaiveDate,
) -> BTreeMap<String, f64> {
    let cutoff = today - Duration::days(RECENT_WINDOW_DAYS);

    weights
        .iter()
        .filter(|(date, _)| **date > cutoff)
        .map(|(date, value)| (date.format(DATE_KEY_FORMAT).to_string(), *value))
        .collect()
}
