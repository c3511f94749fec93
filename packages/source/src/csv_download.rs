//! CSV download source.
//!
//! Fetches a published listing export over HTTP. Failures are reported
//! once; retrying is left to the user.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::parsing::parse_csv_table;
use crate::progress::LoadProgress;
use crate::{ListingSource, RawRecord, SourceError};

/// Request timeout used unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("lima_housing/", env!("CARGO_PKG_VERSION"));

/// Source that downloads a CSV export from a URL.
#[derive(Debug, Clone)]
pub struct CsvDownloadSource {
    url: String,
    delimiter: u8,
    timeout: Duration,
}

impl CsvDownloadSource {
    /// Creates a comma-delimited download source with the default timeout.
    #[must_use]
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_owned(),
            delimiter: b',',
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the whole-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// URL this source downloads from.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ListingSource for CsvDownloadSource {
    fn id(&self) -> &str {
        "csv_download"
    }

    fn label(&self) -> String {
        self.url.clone()
    }

    async fn load(&self, progress: Arc<dyn LoadProgress>) -> Result<Vec<RawRecord>, SourceError> {
        progress.set_message(format!("Downloading {}", self.url));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()?;
        let body = client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        log::debug!("Downloaded {} bytes from {}", body.len(), self.url);

        let records = parse_csv_table(&body, self.delimiter)?;
        progress.set_rows(records.len() as u64);
        log::info!("Parsed {} rows from {}", records.len(), self.url);

        Ok(records)
    }
}
