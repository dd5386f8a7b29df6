//! Workbook source (xlsx, xls, ods) read with calamine.
//!
//! Only the first worksheet is used and its first row is a header. Workbooks
//! are read-only: updating scores requires a CSV or Google sheet.

use super::{SheetError, VocabularySource};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::{Path, PathBuf};
use vocab_core::{parse_rows, RowLayout, VocabularyEntry};

pub struct XlsxFile {
    path: PathBuf,
    layout: RowLayout,
}

impl XlsxFile {
    pub fn new(path: impl AsRef<Path>, layout: RowLayout) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            layout,
        }
    }
}

impl VocabularySource for XlsxFile {
    fn describe(&self) -> String {
        format!("workbook {}", self.path.display())
    }

    fn fetch(&self) -> Result<Vec<VocabularyEntry>, SheetError> {
        let mut workbook = open_workbook_auto(&self.path)
            .map_err(|e| SheetError::Workbook(format!("Failed to open workbook: {}", e)))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| SheetError::Workbook("No sheets found in workbook".to_string()))?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| SheetError::Workbook(format!("Failed to read sheet: {}", e)))?;

        let rows: Vec<Vec<String>> = range
            .rows()
            .skip(1)
            .map(|row| trim_trailing_empty(row.iter().map(cell_string).collect()))
            .collect();

        Ok(parse_rows(&rows, self.layout))
    }

    fn persist(&self, _entries: &[VocabularyEntry]) -> Result<usize, SheetError> {
        Err(SheetError::ReadOnly(self.describe()))
    }
}

/// Worksheet ranges are rectangular; drop the padding so short rows stay short.
fn trim_trailing_empty(mut cells: Vec<String>) -> Vec<String> {
    while cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    cells
}

/// Extract a string from a workbook cell.
fn cell_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        _ => String::new(),
    }
}
