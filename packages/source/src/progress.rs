//! Progress reporting for record loading.
//!
//! [`LoadProgress`] decouples sources from any rendering backend. The CLI
//! plugs in a spinner; tests and non-interactive callers use
//! [`NullProgress`].

use std::sync::Arc;

/// Receives progress updates while a source is loading.
pub trait LoadProgress: Send + Sync {
    /// Update the message shown next to the progress indicator.
    fn set_message(&self, msg: String);

    /// Report the number of rows read so far.
    fn set_rows(&self, rows: u64);

    /// Mark loading as complete with a final message.
    fn finish(&self, msg: String);

    /// Mark loading as failed with a final message.
    fn abandon(&self, msg: String);
}

/// A [`LoadProgress`] that ignores every update.
pub struct NullProgress;

impl LoadProgress for NullProgress {
    fn set_message(&self, _msg: String) {}
    fn set_rows(&self, _rows: u64) {}
    fn finish(&self, _msg: String) {}
    fn abandon(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`] instance.
#[must_use]
pub fn null_progress() -> Arc<dyn LoadProgress> {
    Arc::new(NullProgress)
}
