//! Diet document line-grammar parser
//!
//! A diet log document is a flat sequence of text lines in which exactly two
//! line shapes carry meaning:
//!
//! - date headers (`MM/DD/YY` at the start of a line) open a new dated
//!   section, and
//! - time entries (`H:MM - description` or `HH:MM - description`) attach a
//!   description to the current section.
//!
//! Everything else is ignored. The scan carries a single "current date"
//! through the fold; a time entry seen before any date header has nowhere to
//! go and is dropped.

use anyhow::Result;
use indexmap::IndexMap;
use regex::Regex;

/// Parsed diet document: date -> time -> description, in document order.
pub type DietDocument = IndexMap<String, IndexMap<String, String>>;

/// Separator between the time and the description in a time-entry line
const TIME_SEPARATOR: &str = " - ";

/// Parser for diet log documents
pub struct DocumentParser {
    date_header: Regex,
    time_entry: Regex,
}

impl DocumentParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            date_header: Regex::new(r"^\d{2}/\d{2}/\d{2}")?,
            time_entry: Regex::new(r"^\d{1,2}:\d{2} - ")?,
        })
    }

    /// Scan lines in document order into a dated entry mapping.
    ///
    /// Pure function of its input: the same line sequence always produces
    /// the same document. Within one (date, time) slot the last entry in
    /// document order wins. An empty or unrecognizable input yields an empty
    /// document, not an error.
    pub fn parse<'a, I>(&self, lines: I) -> DietDocument
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut document = DietDocument::new();
        let mut current_date: Option<String> = None;

        for line in lines {
            let text = line.trim();

            if self.date_header.is_match(text) {
                // A date header opens its section even when no entries
                // follow; a repeated header re-opens the existing section
                // without discarding what it already holds
                current_date = Some(text.to_string());
                document.entry(text.to_string()).or_default();
            } else if self.time_entry.is_match(text) {
                if let Some((time, description)) = text.split_once(TIME_SEPARATOR) {
                    match current_date {
                        Some(ref date) => {
                            document
                                .entry(date.clone())
                                .or_default()
                                .insert(time.to_string(), description.to_string());
                        }
                        // Entry before any date header: malformed document,
                        // nothing to attribute it to
                        None => {
                            tracing::debug!(line = text, "Dropping time entry before any date header");
                        }
                    }
                }
            }
        }

        document
    }
}
