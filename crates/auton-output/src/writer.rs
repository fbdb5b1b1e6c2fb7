//! The `OutputWriter` trait implemented by output backends.

use crate::{ExternalEventRow, OutputResult, StatusRow};

/// Sink for exported rows.
///
/// When driven by [`StatusOutputObserver`][crate::StatusOutputObserver],
/// errors are stored and retrieved afterwards with
/// [`take_error`][crate::StatusOutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of external events, in the order given.
    fn write_events(&mut self, rows: &[ExternalEventRow]) -> OutputResult<()>;

    /// Write one status row.
    fn write_status(&mut self, row: &StatusRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
