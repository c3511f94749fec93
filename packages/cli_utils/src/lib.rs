#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared CLI utilities for the Lima housing dashboard.
//!
//! Provides an `indicatif` spinner behind the [`LoadProgress`] trait, plus
//! [`init_logger`] which sets up `indicatif-log-bridge` so that
//! `log::info!` and friends are suspended while the spinner redraws.

use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use lima_housing_source::progress::LoadProgress;

pub use indicatif::MultiProgress;

/// An `indicatif` spinner that implements [`LoadProgress`].
pub struct SpinnerProgress {
    bar: ProgressBar,
    label: String,
}

impl SpinnerProgress {
    /// Starts a spinner for loading `label` and attaches it to `multi`.
    #[must_use]
    pub fn start(multi: &MultiProgress, label: &str) -> Arc<dyn LoadProgress> {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(label.to_string());

        Arc::new(Self {
            bar,
            label: label.to_string(),
        })
    }

    /// A spinner that never draws, for `--json` output and tests.
    #[must_use]
    pub fn hidden(label: &str) -> Self {
        Self {
            bar: ProgressBar::hidden(),
            label: label.to_string(),
        }
    }
}

impl LoadProgress for SpinnerProgress {
    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn set_rows(&self, rows: u64) {
        self.bar
            .set_message(format!("{}: {rows} rows read", self.label));
    }

    fn finish(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }

    fn abandon(&self, msg: String) {
        self.bar.abandon_with_message(msg);
    }
}

/// Initializes the global logger wrapped in `indicatif-log-bridge` so that
/// `log::info!` and friends are suspended while the spinner redraws.
///
/// Returns the [`MultiProgress`] that spinners must be added to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok(); // already set, e.g. when called twice

    log::set_max_level(level);

    multi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_updates_are_labelled() {
        let progress = SpinnerProgress::hidden("sample");
        progress.set_rows(30);
        assert_eq!(progress.bar.message(), "sample: 30 rows read");

        progress.finish("30 listings loaded".to_owned());
        assert_eq!(progress.bar.message(), "30 listings loaded");
    }
}
