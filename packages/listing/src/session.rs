//! Session-scoped dashboard state.
//!
//! A [`DashboardSession`] owns the master collection. Loading is the only
//! asynchronous step: rows are fetched from a [`ListingSource`],
//! normalized in full, and only then published, so a view never observes
//! a half-built collection. Every view and statistics call afterwards is a
//! pure function of the published collection and its arguments.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use lima_housing_listing_models::{DashboardView, FilterSpec, PropertyRecord, StatsSummary};
use lima_housing_source::ListingSource;
use lima_housing_source::progress::LoadProgress;

use crate::aggregate::summarize;
use crate::collate;
use crate::config::ListingConfig;
use crate::filter::build_view;
use crate::normalize::Normalizer;
use crate::ListingError;

/// The published, read-only set of records for a session.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterCollection {
    /// Normalized records in source order.
    pub records: Vec<PropertyRecord>,
    /// Identifier of the source they were loaded from.
    pub source_id: String,
    /// When the collection was published.
    pub loaded_at: DateTime<Utc>,
}

/// Load state of a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Nothing has been loaded yet.
    Unloaded,
    /// The last load attempt failed.
    Failed {
        /// Why the source could not be obtained.
        reason: String,
    },
    /// A collection is published.
    Ready(MasterCollection),
}

/// Dashboard state for one user session.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    config: ListingConfig,
    state: SessionState,
}

impl DashboardSession {
    /// Creates an unloaded session.
    #[must_use]
    pub const fn new(config: ListingConfig) -> Self {
        Self {
            config,
            state: SessionState::Unloaded,
        }
    }

    /// Loads, normalizes and publishes the records of `source`.
    ///
    /// Calling this again is a reload. On failure the session moves to
    /// [`SessionState::Failed`] and any previously published collection is
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::SourceUnavailable`] if the source cannot be
    /// read.
    pub async fn load(
        &mut self,
        source: &dyn ListingSource,
        progress: Arc<dyn LoadProgress>,
    ) -> Result<usize, ListingError> {
        log::info!("Loading listings from {}", source.label());
        progress.set_message(format!("Loading {}...", source.label()));

        let rows = match source.load(Arc::clone(&progress)).await {
            Ok(rows) => rows,
            Err(e) => {
                log::error!("Failed to load {}: {e}", source.id());
                progress.abandon(format!("{} unavailable", source.label()));
                self.state = SessionState::Failed {
                    reason: e.to_string(),
                };
                return Err(ListingError::SourceUnavailable {
                    source_id: source.id().to_owned(),
                    source: e,
                });
            }
        };

        let records = Normalizer::new(&self.config).normalize(&rows);
        let count = records.len();
        progress.finish(format!("{count} listings loaded"));

        self.publish(MasterCollection {
            records,
            source_id: source.id().to_owned(),
            loaded_at: Utc::now(),
        });

        Ok(count)
    }

    /// Publishes an already built collection, replacing the current state.
    pub fn publish(&mut self, collection: MasterCollection) {
        log::debug!(
            "Publishing {} records from {}",
            collection.records.len(),
            collection.source_id
        );
        self.state = SessionState::Ready(collection);
    }

    /// Returns what the listing area should show for `spec`.
    #[must_use]
    pub fn view(&self, spec: &FilterSpec) -> DashboardView<'_> {
        match &self.state {
            SessionState::Unloaded => DashboardView::Loading,
            SessionState::Failed { reason } => DashboardView::Unavailable {
                reason: reason.clone(),
            },
            SessionState::Ready(collection) => {
                build_view(&collection.records, spec, self.config.display_cap())
            }
        }
    }

    /// Returns statistics over the master collection, or `None` before a
    /// successful load.
    #[must_use]
    pub fn stats(&self) -> Option<StatsSummary> {
        self.collection()
            .map(|collection| summarize(&collection.records, &self.config))
    }

    /// Distinct districts of the master collection in collation order.
    #[must_use]
    pub fn districts(&self) -> Vec<&str> {
        let mut districts: Vec<&str> = self
            .records()
            .iter()
            .map(|r| r.district.as_str())
            .collect();
        districts.sort_by(|a, b| collate::compare(a, b));
        districts.dedup();
        districts
    }

    /// Records of the master collection; empty before a successful load.
    #[must_use]
    pub fn records(&self) -> &[PropertyRecord] {
        self.collection()
            .map(|c| c.records.as_slice())
            .unwrap_or_default()
    }

    /// The published collection, if any.
    #[must_use]
    pub const fn collection(&self) -> Option<&MasterCollection> {
        match &self.state {
            SessionState::Ready(collection) => Some(collection),
            SessionState::Unloaded | SessionState::Failed { .. } => None,
        }
    }

    /// Filter the dashboard starts with.
    #[must_use]
    pub const fn default_filter(&self) -> FilterSpec {
        self.config.default_filter()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ListingConfig {
        &self.config
    }

    /// Current load state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }
}
