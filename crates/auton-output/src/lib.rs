//! `auton-output` — simulation output writers for the auton kernel.
//!
//! | File                  | Written by                                  | One row per            |
//! |-----------------------|---------------------------------------------|------------------------|
//! | `external_events.csv` | [`export_external_events`]                  | recorded external event |
//! | `status.csv`          | [`StatusOutputObserver`] during a run       | status report          |
//!
//! Both go through the [`OutputWriter`] trait; [`CsvWriter`] is the only
//! backend.  The external-event file can be fed back to
//! `auton_events::load_initial_events_csv`, which keeps only the
//! `initialization` rows.
//!
//! # Usage
//!
//! ```rust,ignore
//! use auton_output::{CsvWriter, StatusOutputObserver, export_external_events};
//!
//! let mut obs = StatusOutputObserver::new(CsvWriter::new(Path::new("./out"))?);
//! master.run_for(1.0, &stop, &mut obs)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//!
//! export_external_events(master.external_events(), master.clock(), Path::new("./out"))?;
//! ```

pub mod csv;
pub mod error;
pub mod export;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::{CsvWriter, EVENTS_FILE, STATUS_FILE};
pub use error::{OutputError, OutputResult};
pub use export::export_external_events;
pub use observer::StatusOutputObserver;
pub use row::{ExternalEventRow, StatusRow};
pub use writer::OutputWriter;
