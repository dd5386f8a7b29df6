//! Spreadsheet sources: where vocabulary is read from and scores are written to.

pub mod auth;
pub mod csv_file;
pub mod google;
pub mod xlsx;

#[cfg(test)]
pub(crate) mod stub_server;

use crate::config::SourceConfig;
use std::path::Path;
use thiserror::Error;
use vocab_core::{RowLayout, VocabularyEntry};

pub use csv_file::CsvFile;
pub use google::GoogleSheet;
pub use xlsx::XlsxFile;

/// Spreadsheet errors.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Sheets API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("{0} is read-only; scores cannot be written back")]
    ReadOnly(String),

    #[error("Unsupported file format: .{0}")]
    UnsupportedFormat(String),
}

/// A place vocabulary rows come from and go back to.
pub trait VocabularySource {
    /// Short human-readable name for notices and logs.
    fn describe(&self) -> String;

    /// Read every vocabulary row.
    fn fetch(&self) -> Result<Vec<VocabularyEntry>, SheetError>;

    /// Overwrite the stored rows with `entries`. Returns the rows written.
    fn persist(&self, entries: &[VocabularyEntry]) -> Result<usize, SheetError>;
}

/// Open the source named by the configuration.
///
/// Files are dispatched on their extension.
pub fn open_source(
    config: &SourceConfig,
    layout: RowLayout,
) -> Result<Box<dyn VocabularySource>, SheetError> {
    match config {
        SourceConfig::GoogleSheets {
            spreadsheet_id,
            range,
            auth,
        } => Ok(Box::new(GoogleSheet::new(
            spreadsheet_id.clone(),
            range.clone(),
            auth,
            layout,
        )?)),
        SourceConfig::File(path) => open_file(path, layout),
    }
}

fn open_file(path: &Path, layout: RowLayout) -> Result<Box<dyn VocabularySource>, SheetError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => Ok(Box::new(CsvFile::new(path, layout))),
        "xlsx" | "xlsm" | "xls" | "ods" => Ok(Box::new(XlsxFile::new(path, layout))),
        _ => Err(SheetError::UnsupportedFormat(extension)),
    }
}
