#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Listing pipeline for the Lima housing dashboard.
//!
//! Raw rows flow one way: they are normalized into
//! [`PropertyRecord`](lima_housing_listing_models::PropertyRecord)s
//! ([`normalize`]), held in a session-scoped master collection
//! ([`session`]), and from there filtered and sorted into views
//! ([`filter`]) or reduced into statistics ([`aggregate`]). Score
//! derivation and colorizing live in [`score`].

pub mod aggregate;
pub mod coerce;
pub mod collate;
pub mod config;
pub mod filter;
pub mod normalize;
pub mod score;
pub mod session;

use lima_housing_source::SourceError;

pub use config::{ConfigError, ListingConfig};
pub use normalize::Normalizer;
pub use session::{DashboardSession, MasterCollection, SessionState};

/// Errors surfaced by the listing pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    /// The raw record source could not be obtained. Recoverable by a
    /// user-triggered reload.
    #[error("Listing source '{source_id}' is unavailable: {source}")]
    SourceUnavailable {
        /// Identifier of the source that failed.
        source_id: String,
        /// Underlying error.
        #[source]
        source: SourceError,
    },

    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An operation needed a loaded collection but none is published.
    #[error("No listings have been loaded")]
    NotLoaded,
}
