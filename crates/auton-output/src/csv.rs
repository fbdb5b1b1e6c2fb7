//! CSV output backend.
//!
//! Writes up to two files in the configured output directory:
//! - `external_events.csv`
//! - `status.csv`
//!
//! Each file is created (with its header row) the first time something is
//! written to it, so an export-only writer leaves no empty status file.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{ExternalEventRow, OutputResult, StatusRow};

pub const EVENTS_FILE: &str = "external_events.csv";
pub const STATUS_FILE: &str = "status.csv";

const EVENTS_HEADER: [&str; 9] = ["id", "tmu", "seconds", "kind", "origin", "x", "y", "tag", "value"];
const STATUS_HEADER: [&str; 8] = [
    "tmu",
    "seconds",
    "percent_complete",
    "events_initiated",
    "internal_queue",
    "external_queue",
    "macro_steps",
    "micro_steps",
];

/// Writes simulation output to CSV files in one directory.
pub struct CsvWriter {
    dir:      PathBuf,
    events:   Option<Writer<File>>,
    status:   Option<Writer<File>>,
    finished: bool,
}

impl CsvWriter {
    /// Create `dir` (and parents) if needed.  No file is opened yet.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            events: None,
            status: None,
            finished: false,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn open(dir: &Path, name: &str, header: &[&str]) -> OutputResult<Writer<File>> {
        let path = dir.join(name);
        let mut w = Writer::from_path(&path)?;
        w.write_record(header)?;
        tracing::debug!(path = %path.display(), "output file opened");
        Ok(w)
    }
}

impl OutputWriter for CsvWriter {
    fn write_events(&mut self, rows: &[ExternalEventRow]) -> OutputResult<()> {
        let w = match self.events.take() {
            Some(w) => w,
            None => Self::open(&self.dir, EVENTS_FILE, &EVENTS_HEADER)?,
        };
        let w = self.events.insert(w);
        for row in rows {
            w.write_record(&[
                row.id.to_string(),
                row.tmu.to_string(),
                row.seconds.to_string(),
                row.kind.to_string(),
                row.origin.map(|o| o.to_string()).unwrap_or_default(),
                row.x.to_string(),
                row.y.to_string(),
                row.tag.clone(),
                row.value.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_status(&mut self, row: &StatusRow) -> OutputResult<()> {
        let w = match self.status.take() {
            Some(w) => w,
            None => Self::open(&self.dir, STATUS_FILE, &STATUS_HEADER)?,
        };
        let w = self.status.insert(w);
        w.write_record(&[
            row.tmu.to_string(),
            row.seconds.to_string(),
            format!("{:.3}", row.percent_complete),
            row.events_initiated.to_string(),
            row.internal_queue.to_string(),
            row.external_queue.to_string(),
            row.macro_steps.to_string(),
            row.micro_steps.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        if let Some(w) = &mut self.events {
            w.flush()?;
        }
        if let Some(w) = &mut self.status {
            w.flush()?;
        }
        Ok(())
    }
}
