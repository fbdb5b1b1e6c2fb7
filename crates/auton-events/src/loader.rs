//! CSV loader for pre-seeded initialization events.
//!
//! # CSV format
//!
//! One row per stimulus.  Columns are matched by header name; extra columns
//! are ignored, so the external-event log written by `auton-output` can be
//! fed straight back in.
//!
//! ```csv
//! tmu,x,y,tag,value
//! 500,120.0,80.5,scream,1.0
//! 2000,300.0,200.0,call,0.5
//! ```
//!
//! An optional `kind` column filters rows: rows whose `kind` is present and
//! not `initialization` are skipped.  Exported emission and detection records
//! are consequences of the run, not inputs to it.
//!
//! Rows are returned sorted by tmu (stable, so equal tmus keep file order).

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use auton_core::{Position, Tmu};

use crate::event::{ExternalKind, InitialEvent, Signal};
use crate::EventError;

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct InitialEventRecord {
    tmu:   u64,
    x:     f64,
    y:     f64,
    tag:   String,
    value: f64,
    kind:  Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load initialization events from a CSV file.
pub fn load_initial_events_csv(path: &Path) -> Result<Vec<InitialEvent>, EventError> {
    let file = std::fs::File::open(path).map_err(EventError::Io)?;
    load_initial_events_reader(file)
}

/// Like [`load_initial_events_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`).
pub fn load_initial_events_reader<R: Read>(reader: R) -> Result<Vec<InitialEvent>, EventError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut events = Vec::new();
    let mut skipped = 0usize;

    for result in csv_reader.deserialize::<InitialEventRecord>() {
        let row = result.map_err(|e| EventError::Parse(e.to_string()))?;

        if let Some(kind) = row.kind.as_deref() {
            if kind.parse::<ExternalKind>()? != ExternalKind::Initialization {
                skipped += 1;
                continue;
            }
        }

        let position = Position::new(row.x, row.y);
        if !position.is_finite() {
            return Err(EventError::Parse(format!(
                "non-finite position {position} at tmu {}",
                row.tmu
            )));
        }

        events.push(InitialEvent {
            tmu: Tmu(row.tmu),
            position,
            signal: Signal::new(row.tag, row.value),
        });
    }

    if skipped > 0 {
        tracing::debug!(skipped, "ignored non-initialization rows in event log");
    }

    events.sort_by_key(|e| e.tmu);
    Ok(events)
}
