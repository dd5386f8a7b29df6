//! Google Sheets source over the Sheets REST API (v4).
//!
//! Reads `GET /v4/spreadsheets/{id}/values/{range}` and writes the whole
//! range back with `PUT …?valueInputOption=RAW`.
//!
//! Rows too short to parse are kept from the last fetch and written back
//! after the entries, and the write is padded with blank rows up to the
//! fetched row count, so a shorter deck never leaves stale rows behind.

use super::auth::Credentials;
use super::{SheetError, VocabularySource};
use crate::config::SheetAuth;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use vocab_core::{parse_rows, to_row, RowLayout, VocabularyEntry, ROW_WIDTH};

const SHEETS_API_URL: &str = "https://sheets.googleapis.com";

/// Values of a sheet range, as sent and received by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    /// Absent when the range is empty.
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateValuesResponse {
    #[serde(default)]
    updated_rows: Option<usize>,
}

pub struct GoogleSheet {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
    range: String,
    credentials: Credentials,
    layout: RowLayout,
    fetched_rows: Cell<usize>,
    retained_rows: RefCell<Vec<Vec<Value>>>,
}

impl GoogleSheet {
    pub fn new(
        spreadsheet_id: String,
        range: String,
        auth: &SheetAuth,
        layout: RowLayout,
    ) -> Result<Self, SheetError> {
        Self::with_base_url(SHEETS_API_URL, Client::new(), spreadsheet_id, range, auth, layout)
    }

    /// Point the client at another API host (a proxy or test server).
    pub fn with_base_url(
        base_url: &str,
        client: Client,
        spreadsheet_id: String,
        range: String,
        auth: &SheetAuth,
        layout: RowLayout,
    ) -> Result<Self, SheetError> {
        let credentials = Credentials::from_config(auth, &client)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            spreadsheet_id,
            range,
            credentials,
            layout,
            fetched_rows: Cell::new(0),
            retained_rows: RefCell::new(Vec::new()),
        })
    }

    /// URL of the configured range, with the range percent-encoded.
    pub fn values_url(&self) -> Result<Url, SheetError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| SheetError::Parse(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| SheetError::Parse(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.spreadsheet_id.as_str(),
                "values",
                self.range.as_str(),
            ]);
        Ok(url)
    }

    fn send(&self, request: RequestBuilder) -> Result<reqwest::blocking::Response, SheetError> {
        let resp = self
            .credentials
            .apply(request)?
            .send()
            .map_err(|e| SheetError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().unwrap_or_default();
            return Err(SheetError::Api { status, message });
        }
        Ok(resp)
    }
}

impl VocabularySource for GoogleSheet {
    fn describe(&self) -> String {
        format!("Google sheet {} ({})", self.spreadsheet_id, self.range)
    }

    fn fetch(&self) -> Result<Vec<VocabularyEntry>, SheetError> {
        let url = self.values_url()?;
        tracing::info!("Fetching vocabulary from {}", self.describe());

        let resp = self.send(self.client.get(url))?;
        let body: ValueRange = resp.json().map_err(|e| SheetError::Parse(e.to_string()))?;

        let retained = unparsed_rows(&body);
        if !retained.is_empty() {
            tracing::warn!(
                "{} rows of {} are incomplete and will be kept as they are",
                retained.len(),
                self.describe()
            );
        }
        self.fetched_rows.set(body.values.len());
        *self.retained_rows.borrow_mut() = retained;

        Ok(entries_from_values(&body, self.layout))
    }

    fn persist(&self, entries: &[VocabularyEntry]) -> Result<usize, SheetError> {
        let url = self.values_url()?;
        let mut body = values_from_entries(entries, &self.range, self.layout);
        body.values.extend(self.retained_rows.borrow().iter().cloned());
        pad_rows(&mut body, self.fetched_rows.get());
        tracing::info!(
            "Writing {} entries ({} rows) to {}",
            entries.len(),
            body.values.len(),
            self.describe()
        );

        let resp = self.send(
            self.client
                .put(url)
                .query(&[("valueInputOption", "RAW")])
                .json(&body),
        )?;
        let response: UpdateValuesResponse =
            resp.json().map_err(|e| SheetError::Parse(e.to_string()))?;

        Ok(response.updated_rows.unwrap_or(body.values.len()))
    }
}

/// Convert an API value range to entries.
pub fn entries_from_values(values: &ValueRange, layout: RowLayout) -> Vec<VocabularyEntry> {
    let rows: Vec<Vec<String>> = values
        .values
        .iter()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    parse_rows(&rows, layout)
}

/// Build the request body that overwrites `range` with `entries`.
///
/// Scores are sent as numbers so the sheet keeps them numeric.
pub fn values_from_entries(entries: &[VocabularyEntry], range: &str, layout: RowLayout) -> ValueRange {
    let values = entries
        .iter()
        .map(|entry| {
            let mut row: Vec<Value> = to_row(entry, layout)
                .into_iter()
                .take(4)
                .map(Value::String)
                .collect();
            row.push(Value::from(entry.score));
            row
        })
        .collect();

    ValueRange {
        range: Some(range.to_string()),
        major_dimension: Some("ROWS".to_string()),
        values,
    }
}

/// Non-blank rows that are too short to become entries.
fn unparsed_rows(values: &ValueRange) -> Vec<Vec<Value>> {
    values
        .values
        .iter()
        .filter(|row| row.len() < ROW_WIDTH && row.iter().any(|cell| !cell_text(cell).is_empty()))
        .cloned()
        .collect()
}

/// Append blank rows until `body` covers `rows` rows.
fn pad_rows(body: &mut ValueRange, rows: usize) {
    while body.values.len() < rows {
        body.values.push(vec![Value::String(String::new()); ROW_WIDTH]);
    }
}

fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
