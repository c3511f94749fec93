//! Embedded sample data set.
//!
//! Thirty synthetic Lima rental listings (three per district across ten
//! districts) baked into the binary with [`include_str!`]. Used when no
//! real export is available and as a stable fixture in tests.

use std::sync::Arc;

use async_trait::async_trait;

use crate::parsing::parse_csv_table;
use crate::progress::LoadProgress;
use crate::{ListingSource, RawRecord, SourceError};

/// Identifier of the embedded sample source.
pub const SAMPLE_SOURCE_ID: &str = "sample";

/// The embedded CSV table.
const SAMPLE_CSV: &str = include_str!("../data/sample_properties.csv");

/// Source backed by the embedded sample table.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleSource;

impl SampleSource {
    /// Parses the embedded table synchronously.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the embedded table is malformed.
    pub fn rows() -> Result<Vec<RawRecord>, SourceError> {
        parse_csv_table(SAMPLE_CSV.as_bytes(), b',')
    }
}

#[async_trait]
impl ListingSource for SampleSource {
    fn id(&self) -> &str {
        SAMPLE_SOURCE_ID
    }

    fn label(&self) -> String {
        "embedded sample data".to_owned()
    }

    async fn load(&self, progress: Arc<dyn LoadProgress>) -> Result<Vec<RawRecord>, SourceError> {
        progress.set_message("Loading sample data".to_owned());
        let records = Self::rows()?;
        progress.set_rows(records.len() as u64);
        log::info!("Loaded {} sample rows", records.len());
        Ok(records)
    }
}
