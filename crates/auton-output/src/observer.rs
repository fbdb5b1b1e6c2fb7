//! `StatusOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use auton_sim::{RunSummary, SimObserver, StatusSnapshot};

use crate::row::StatusRow;
use crate::writer::OutputWriter;
use crate::OutputError;

/// A [`SimObserver`] that writes every status report to an
/// [`OutputWriter`] and finishes the writer when the run ends.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `master.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct StatusOutputObserver<W: OutputWriter> {
    writer:     W,
    rows:       usize,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> StatusOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, rows: 0, last_error: None }
    }

    /// Take the stored write error (if any) after the run returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Status rows written so far.
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                tracing::warn!(error = %e, "status output failed");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for StatusOutputObserver<W> {
    fn on_status(&mut self, status: &StatusSnapshot) {
        let result = self.writer.write_status(&StatusRow::from(status));
        if result.is_ok() {
            self.rows += 1;
        }
        self.store_err(result);
    }

    fn on_run_end(&mut self, _summary: &RunSummary) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
