#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Raw property record sources.
//!
//! A [`ListingSource`] knows how to obtain the raw, untyped rows of the
//! listing dataset: a local CSV export ([`csv_file`]), a CSV served over
//! HTTP ([`csv_download`]), or the embedded sample set ([`sample`]). Rows
//! are returned as [`serde_json::Value`] objects keyed by column header;
//! typing and coercion happen downstream in the listing normalizer.

pub mod csv_download;
pub mod csv_file;
pub mod parsing;
pub mod progress;
pub mod sample;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::csv_download::CsvDownloadSource;
use crate::csv_file::CsvFileSource;
use crate::progress::LoadProgress;
use crate::sample::SampleSource;

/// One untyped row of the listing dataset, keyed by column header.
pub type RawRecord = serde_json::Value;

/// Errors that can occur while obtaining raw records.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error (file read).
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The payload was readable but not a usable listing table.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of what went wrong.
        message: String,
    },
}

/// A provider of raw listing rows.
///
/// Loading is the only suspension point of the dashboard: everything
/// downstream of it is synchronous.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Returns a short identifier for this source (e.g. `"sample"`).
    fn id(&self) -> &str;

    /// Returns a human-readable description for log and UI messages.
    fn label(&self) -> String;

    /// Obtains every raw row from the source.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the source cannot be read or does not
    /// contain a header row.
    async fn load(&self, progress: Arc<dyn LoadProgress>) -> Result<Vec<RawRecord>, SourceError>;
}

/// Resolves a user-supplied source string to a [`ListingSource`].
///
/// `"sample"` selects the embedded data set, `http://` and `https://`
/// URLs are downloaded, and anything else is treated as a file path.
#[must_use]
pub fn source_from_spec(spec: &str) -> Box<dyn ListingSource> {
    let spec = spec.trim();
    if spec.is_empty() || spec.eq_ignore_ascii_case(sample::SAMPLE_SOURCE_ID) {
        Box::new(SampleSource)
    } else if spec.starts_with("http://") || spec.starts_with("https://") {
        Box::new(CsvDownloadSource::new(spec))
    } else {
        Box::new(CsvFileSource::new(spec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_sample_source() {
        assert_eq!(source_from_spec("sample").id(), "sample");
        assert_eq!(source_from_spec("").id(), "sample");
    }

    #[test]
    fn resolves_url_source() {
        assert_eq!(
            source_from_spec("https://example.org/scored_properties.csv").id(),
            "csv_download"
        );
    }

    #[test]
    fn resolves_file_source() {
        assert_eq!(
            source_from_spec("data/processed/scored_properties.csv").id(),
            "csv_file"
        );
    }
}
