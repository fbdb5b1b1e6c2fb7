//! One-shot export of the external event log.

use std::path::Path;

use auton_core::SimClock;
use auton_events::ExternalEvent;

use crate::row::ExternalEventRow;
use crate::writer::OutputWriter;
use crate::{CsvWriter, OutputResult};

/// Write `events` to `dir/external_events.csv`, replacing any previous file,
/// and return the number of rows written.
///
/// Rows keep the iteration order, which for `Master::external_events` is
/// tmu order.  The header is written even when there are no events.
pub fn export_external_events<'a, I>(events: I, clock: &SimClock, dir: &Path) -> OutputResult<usize>
where
    I: IntoIterator<Item = &'a ExternalEvent>,
{
    let rows: Vec<ExternalEventRow> = events
        .into_iter()
        .map(|e| ExternalEventRow::from_event(e, clock))
        .collect();

    let mut writer = CsvWriter::new(dir)?;
    writer.write_events(&rows)?;
    writer.finish()?;

    tracing::info!(rows = rows.len(), dir = %dir.display(), "external events exported");
    Ok(rows.len())
}
