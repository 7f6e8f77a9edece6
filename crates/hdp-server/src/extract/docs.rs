//! Diet document extractor
//!
//! Fetches the diet log document and runs the line-grammar scan from
//! `hdp_common::diet`. The fetch and the scan either both succeed or the
//! extraction fails as a whole; there is no partial document.

use tracing::info;

use super::{google::GoogleClient, ExtractError};
use hdp_common::diet::{DietDocument, DocumentParser};

/// Extractor over one diet log document
pub struct DietExtractor<'a> {
    client: &'a GoogleClient,
    parser: &'a DocumentParser,
    doc_id: &'a str,
}

impl<'a> DietExtractor<'a> {
    pub fn new(client: &'a GoogleClient, parser: &'a DocumentParser, doc_id: &'a str) -> Self {
        Self {
            client,
            parser,
            doc_id,
        }
    }

    /// Fetch the document and scan it into dated diet entries
    pub async fn recent(&self) -> Result<DietDocument, ExtractError> {
        let lines = self.client.fetch_document_lines(self.doc_id).await?;
        let document = self.parser.parse(lines.iter().map(String::as_str));

        info!(
            dates = document.len(),
            entries = document.values().map(|d| d.len()).sum::<usize>(),
            "Extracted diet document"
        );

        Ok(document)
    }
}
