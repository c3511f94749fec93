//! Local CSV file source.
//!
//! Reads a listing export from disk, typically the
//! `scored_properties.csv` produced by the scoring pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::parsing::parse_csv_table;
use crate::progress::LoadProgress;
use crate::{ListingSource, RawRecord, SourceError};

/// Source that reads a CSV file from the local filesystem.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    /// Path of the CSV file.
    path: PathBuf,
    /// Field delimiter byte (defaults to `,`).
    delimiter: u8,
}

impl CsvFileSource {
    /// Creates a comma-delimited file source.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: b',',
        }
    }

    /// Sets the field delimiter (e.g. `b';'` for spreadsheet exports).
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Path this source reads from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ListingSource for CsvFileSource {
    fn id(&self) -> &str {
        "csv_file"
    }

    fn label(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self, progress: Arc<dyn LoadProgress>) -> Result<Vec<RawRecord>, SourceError> {
        progress.set_message(format!("Reading {}", self.path.display()));

        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;

        log::debug!("Read {} bytes from {}", bytes.len(), self.path.display());

        let records = parse_csv_table(&bytes, self.delimiter)?;
        progress.set_rows(records.len() as u64);

        log::info!(
            "Loaded {} rows from {}",
            records.len(),
            self.path.display()
        );

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::null_progress;

    fn temp_csv(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "lima_housing_{name}_{}.csv",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn loads_rows_from_disk() {
        let path = temp_csv(
            "file_source",
            "location,price_clean,final_score\n\"Jr. Ucayali 300, Lima\",900,5.2\n",
        );
        let rows = CsvFileSource::new(&path)
            .load(null_progress())
            .await
            .unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["price_clean"], "900");
    }

    #[tokio::test]
    async fn loads_semicolon_export() {
        let path = temp_csv("file_source_semicolon", "district;price\nLince;1150\n");
        let rows = CsvFileSource::new(&path)
            .with_delimiter(b';')
            .load(null_progress())
            .await
            .unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(rows[0]["district"], "Lince");
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let source = CsvFileSource::new("/definitely/not/here/scored_properties.csv");
        let err = source.load(null_progress()).await.unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }
}
