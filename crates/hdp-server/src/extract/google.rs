//! Google Docs / Sheets REST client
//!
//! Thin typed client over the two read-only Google endpoints the pipeline
//! uses. Responses are deserialized into explicit structs rather than walked
//! dynamically, so a shape change in the upstream API fails loudly at the
//! deserialization boundary.

use serde::Deserialize;
use tracing::debug;

use super::ExtractError;

/// Production base URL for the Google Docs API
pub const DOCS_BASE_URL: &str = "https://docs.googleapis.com";

/// Production base URL for the Google Sheets API
pub const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";

/// Typed Google credentials.
///
/// The secrets layer stores the blob with single-quoted fields (a quirk of
/// its storage format); [`GoogleCredentials::from_secret_blob`] normalizes it
/// to strict JSON before deserializing. Token minting is the secrets layer's
/// job; the blob arrives with a ready bearer token.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleCredentials {
    pub access_token: String,
    #[serde(default)]
    pub client_email: Option<String>,
}

impl GoogleCredentials {
    /// Normalize a single-quoted secret blob to strict JSON and parse it
    pub fn from_secret_blob(raw: &str) -> Result<Self, ExtractError> {
        let normalized = raw.replace('\'', "\"");
        serde_json::from_str(&normalized)
            .map_err(|e| ExtractError::Credentials(e.to_string()))
    }
}

/// Client for the Google Docs and Sheets REST APIs
#[derive(Debug, Clone)]
pub struct GoogleClient {
    http: reqwest::Client,
    token: String,
    docs_base: String,
    sheets_base: String,
}

impl GoogleClient {
    pub fn new(credentials: &GoogleCredentials) -> Self {
        Self::with_base_urls(credentials, DOCS_BASE_URL, SHEETS_BASE_URL)
    }

    /// Create a client against non-production endpoints (tests, proxies)
    pub fn with_base_urls(
        credentials: &GoogleCredentials,
        docs_base: impl Into<String>,
        sheets_base: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: credentials.access_token.clone(),
            docs_base: docs_base.into(),
            sheets_base: sheets_base.into(),
        }
    }

    /// Fetch a document body as its ordered sequence of paragraph text lines
    pub async fn fetch_document_lines(&self, doc_id: &str) -> Result<Vec<String>, ExtractError> {
        let url = format!("{}/v1/documents/{}", self.docs_base, doc_id);
        debug!(doc_id, "Fetching document");

        let document: Document = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(document.lines())
    }

    /// Fetch a cell range as rows of string cells
    pub async fn fetch_values(
        &self,
        sheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, ExtractError> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.sheets_base, sheet_id, range
        );
        debug!(sheet_id, range, "Fetching sheet values");

        let values: ValueRange = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(values.values)
    }
}

// ============================================================================
// Google Docs response shapes (documents.get)
// ============================================================================

#[derive(Debug, Deserialize)]
struct Document {
    body: Body,
}

impl Document {
    /// Flatten the structural tree into paragraph text runs, in document order
    fn lines(self) -> Vec<String> {
        self.body
            .content
            .into_iter()
            .filter_map(|element| element.paragraph)
            .flat_map(|paragraph| paragraph.elements)
            .filter_map(|element| element.text_run)
            .map(|run| run.content)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct Body {
    #[serde(default)]
    content: Vec<StructuralElement>,
}

#[derive(Debug, Deserialize)]
struct StructuralElement {
    paragraph: Option<Paragraph>,
}

#[derive(Debug, Deserialize)]
struct Paragraph {
    #[serde(default)]
    elements: Vec<ParagraphElement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParagraphElement {
    text_run: Option<TextRun>,
}

#[derive(Debug, Deserialize)]
struct TextRun {
    content: String,
}

// ============================================================================
// Google Sheets response shapes (spreadsheets.values.get)
// ============================================================================

#[derive(Debug, Deserialize)]
struct ValueRange {
    /// Absent entirely when the range is empty
    #[serde(default)]
    values: Vec<Vec<String>>,
}
