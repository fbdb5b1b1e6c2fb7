//! Simulation observer trait for progress reporting and data collection.

use auton_core::Tmu;

use crate::{RunSummary, StatusSnapshot};

/// Callbacks invoked by [`Master::run`][crate::Master::run] at key points in
/// the loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Callbacks run on the simulation thread
/// and must return quickly.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter;
///
/// impl SimObserver for ProgressPrinter {
///     fn on_status(&mut self, status: &StatusSnapshot) {
///         println!("{status}");
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called once before the first step.
    fn on_run_start(&mut self, _iterations: u64) {}

    /// Called after every micro step; `delivered` internal events were
    /// handled at `tmu`.
    fn on_micro_step(&mut self, _tmu: Tmu, _delivered: usize) {}

    /// Called after every macro step; `acting` agents returned actions.
    fn on_macro_step(&mut self, _tmu: Tmu, _acting: usize) {}

    /// Called at most once per status interval, and once more at the end of
    /// the run with the final state.
    fn on_status(&mut self, _status: &StatusSnapshot) {}

    /// Called once after the loop exits, whether completed or cancelled.
    fn on_run_end(&mut self, _summary: &RunSummary) {}
}

impl<O: SimObserver + ?Sized> SimObserver for Box<O> {
    fn on_run_start(&mut self, iterations: u64) {
        (**self).on_run_start(iterations)
    }
    fn on_micro_step(&mut self, tmu: Tmu, delivered: usize) {
        (**self).on_micro_step(tmu, delivered)
    }
    fn on_macro_step(&mut self, tmu: Tmu, acting: usize) {
        (**self).on_macro_step(tmu, acting)
    }
    fn on_status(&mut self, status: &StatusSnapshot) {
        (**self).on_status(status)
    }
    fn on_run_end(&mut self, summary: &RunSummary) {
        (**self).on_run_end(summary)
    }
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Reports status and the run summary through `tracing` at `info`.
pub struct LogObserver;

impl SimObserver for LogObserver {
    fn on_status(&mut self, s: &StatusSnapshot) {
        tracing::info!(
            tmu = s.current_tmu.0,
            percent = s.percent_complete,
            initiated = s.events_initiated,
            internal = s.internal_queue_depth,
            external = s.external_queue_depth,
            "status"
        );
    }

    fn on_run_end(&mut self, summary: &RunSummary) {
        tracing::info!(
            outcome = ?summary.outcome,
            final_tmu = summary.final_tmu.0,
            macro_steps = summary.counters.macro_steps,
            micro_steps = summary.counters.micro_steps,
            wall_ms = summary.wall_time.as_millis() as u64,
            "run finished"
        );
    }
}
