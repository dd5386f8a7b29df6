//! CSV file source.
//!
//! The first line is a header and is never read as vocabulary. Rows may be
//! ragged; short rows are dropped by the row codec.

use super::{SheetError, VocabularySource};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use vocab_core::{parse_rows, to_row, RowLayout, VocabularyEntry};

pub struct CsvFile {
    path: PathBuf,
    layout: RowLayout,
}

impl CsvFile {
    pub fn new(path: impl AsRef<Path>, layout: RowLayout) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            layout,
        }
    }

    /// Sibling temp path, so the final rename stays on one file system.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "vocabulary.csv".to_string());
        self.path
            .with_file_name(format!(".{}.{}.tmp", name, uuid::Uuid::new_v4()))
    }

    fn write_rows(&self, target: &Path, entries: &[VocabularyEntry]) -> Result<(), SheetError> {
        let mut writer = WriterBuilder::new().from_path(target)?;
        writer.write_record(self.layout.header())?;
        for entry in entries {
            writer.write_record(to_row(entry, self.layout))?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl VocabularySource for CsvFile {
    fn describe(&self) -> String {
        format!("CSV file {}", self.path.display())
    }

    fn fetch(&self) -> Result<Vec<VocabularyEntry>, SheetError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }

        let entries = parse_rows(&rows, self.layout);
        tracing::debug!(
            "Read {} rows ({} usable) from {}",
            rows.len(),
            entries.len(),
            self.path.display()
        );
        Ok(entries)
    }

    fn persist(&self, entries: &[VocabularyEntry]) -> Result<usize, SheetError> {
        let temp = self.temp_path();
        if let Err(e) = self.write_rows(&temp, entries) {
            fs::remove_file(&temp).ok();
            return Err(e);
        }
        fs::rename(&temp, &self.path)?;
        Ok(entries.len())
    }
}
